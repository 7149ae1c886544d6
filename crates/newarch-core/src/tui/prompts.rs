//! Charm-style CLI prompts using cliclack

use crate::error::ScaffoldError;
use crate::product::{upgrade_helper_url, ProductConfig};
use crate::project::{
    inspect_project, resolve_identity, IdentityField, IdentityOverrides, IdentityPrompt,
    ProjectDefaults, ProjectIdentity,
};
use crate::runtime::{self, WorkingTreeStatus};
use crate::templates::{
    android_source_root, extract_template, version, ArchiveFetcher, ArchiveSource,
    ExtractionTargets, PlaceholderSet,
};
use anyhow::Result;
use colored::Colorize;
use std::path::{Path, PathBuf};

/// CLI arguments for a scaffolding run
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    /// Project root (defaults to the current directory)
    pub project_dir: Option<PathBuf>,

    /// Local directory to use as the template instead of downloading the archive
    pub template_dir: Option<PathBuf>,

    /// Package identifier, skips its prompt
    pub package_name: Option<String>,

    /// Main component name, skips its prompt
    pub app_name: Option<String>,

    /// YAML file with the placeholder set to apply
    pub placeholders: Option<PathBuf>,

    /// Auto-confirm all prompts (non-interactive mode)
    pub yes: bool,
}

/// Identity prompts backed by cliclack inputs
pub struct ClackPrompt;

impl IdentityPrompt for ClackPrompt {
    fn ask(&mut self, field: IdentityField, default: &str) -> Result<String> {
        let input: String = cliclack::input(field.prompt_label())
            .placeholder(default)
            .default_input(default)
            .validate(move |value: &String| {
                if value.trim().is_empty() {
                    return Ok(());
                }
                field.validate(value).map(|_| ()).map_err(|e| e.to_string())
            })
            .interact()?;
        Ok(input)
    }
}

/// Run the CLI with interactive prompts
pub async fn run<C: ProductConfig>(config: &C, args: CreateArgs) -> Result<()> {
    cliclack::intro(config.display_name())?;
    cliclack::log::remark(config.cli_description())?;

    let project_dir = match &args.project_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };

    // Step 1: Refuse to touch a dirty working tree
    preflight(&project_dir)?;

    // Step 2: Derive defaults from the project
    let defaults = inspect_project(&project_dir)?;
    if let Some(declared) = &defaults.declared {
        cliclack::log::info(format!(
            "Found existing names in {}",
            declared.source.display()
        ))?;
    }

    let placeholders = match &args.placeholders {
        Some(path) => {
            cliclack::log::info(format!("Using placeholders from {}", path.display()))?;
            PlaceholderSet::load(path)?
        }
        None => PlaceholderSet::default(),
    };

    // Step 3: Confirm the identity
    let identity = resolve(&defaults, &args)?;
    placeholders.check_identity(&identity)?;
    cliclack::log::success(format!(
        "Using {} ({})",
        identity.app_name, identity.package_identifier
    ))?;

    // Step 4: Check destinations before downloading anything
    let targets = ExtractionTargets::for_project(&project_dir, &identity);
    targets.ensure_vacant()?;

    if let Some(rn_version) = defaults.react_native_version.as_deref() {
        if let Some(warning) = version::check_compatibility(
            rn_version,
            config.minimum_react_native_version(),
            config.target_react_native_version(),
        ) {
            cliclack::log::warning(warning)?;
        }
    }

    // Step 5: Fetch and extract
    let fetcher = setup_fetcher(config, &args.template_dir)?;
    create_files(&fetcher, &targets).await?;

    // Step 6: Replace placeholders
    rewrite_placeholders(&project_dir, &placeholders, &identity)?;

    // Step 7: Show next steps
    print_next_steps(config, defaults.react_native_version.as_deref(), args.yes)?;

    Ok(())
}

fn preflight(project_dir: &Path) -> Result<()> {
    match runtime::ensure_clean_tree(project_dir)? {
        WorkingTreeStatus::NotARepository => {
            let reason = if runtime::git_available() {
                "is not a git repository"
            } else {
                "cannot be checked because git is not installed"
            };
            cliclack::log::warning(format!(
                "{} {}; changes made by this tool cannot be reverted with git",
                project_dir.display(),
                reason
            ))?;
        }
        _ => cliclack::log::success("Git working tree is clean")?,
    }
    Ok(())
}

fn resolve(defaults: &ProjectDefaults, args: &CreateArgs) -> Result<ProjectIdentity> {
    let overrides = IdentityOverrides {
        package_identifier: args.package_name.clone(),
        app_name: args.app_name.clone(),
        accept_defaults: args.yes,
    };
    if args.yes {
        cliclack::log::info("Accepting default names (--yes mode)")?;
    }
    resolve_identity(
        &defaults.app_name,
        &defaults.package_identifier,
        &overrides,
        &mut ClackPrompt,
    )
}

fn setup_fetcher<C: ProductConfig>(
    config: &C,
    template_dir: &Option<PathBuf>,
) -> Result<ArchiveFetcher> {
    let fetcher = match template_dir {
        Some(path) => ArchiveFetcher::from_local(path.clone(), config.user_agent()),
        None => ArchiveFetcher::from_config(config)?,
    };

    match fetcher.source() {
        ArchiveSource::Local(_) => {
            cliclack::log::info(format!("Using local template from {}", fetcher.source()))?
        }
        ArchiveSource::Remote(_) => {
            cliclack::log::info(format!("Using template archive {}", fetcher.source()))?
        }
    }

    Ok(fetcher)
}

async fn create_files(fetcher: &ArchiveFetcher, targets: &ExtractionTargets) -> Result<()> {
    let spinner = cliclack::spinner();
    spinner.start("Downloading and extracting necessary files into android directory...");

    let result = match fetcher.fetch().await {
        Ok(template) => extract_template(&template, targets).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(report) => {
            spinner.stop(format!(
                "Created {} files ({} JNI, {} new architecture)",
                report.total(),
                report.native_glue.len(),
                report.new_arch_glue.len()
            ));
            Ok(())
        }
        Err(e) => {
            spinner.stop("Failed to create files");
            Err(e)
        }
    }
}

fn rewrite_placeholders(
    project_dir: &Path,
    placeholders: &PlaceholderSet,
    identity: &ProjectIdentity,
) -> Result<()> {
    let spinner = cliclack::spinner();
    spinner.start("Replacing placeholders...");

    let rewriter = placeholders.compile(identity)?;
    let report = match rewriter.rewrite_tree(&android_source_root(project_dir)) {
        Ok(report) => report,
        Err(e) => {
            spinner.stop("Failed to replace placeholders");
            return Err(e);
        }
    };

    spinner.stop(format!(
        "Replaced {} placeholder(s) in {} of {} files",
        report.replacements, report.files_rewritten, report.files_scanned
    ));
    if report.files_skipped > 0 {
        cliclack::log::info(format!(
            "Skipped {} non-text file(s)",
            report.files_skipped
        ))?;
    }
    Ok(())
}

fn print_next_steps<C: ProductConfig>(
    config: &C,
    react_native_version: Option<&str>,
    non_interactive: bool,
) -> Result<()> {
    let steps = config.next_steps(react_native_version);

    println!();
    println!("  {}", "Next steps".bold());
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}  {}", format!("{}.", i + 1).dimmed(), step);
    }
    println!();

    if !non_interactive {
        let from = react_native_version.and_then(version::normalized_version);
        let url = upgrade_helper_url(from.as_deref(), config.target_react_native_version());
        let open_it: bool = cliclack::confirm("Open the upgrade helper in your browser?")
            .initial_value(false)
            .interact()?;
        if open_it {
            open::that(&url)?;
        }
    }

    cliclack::outro("New architecture files created")?;

    Ok(())
}

/// Report a precondition failure the way the prompts do and pick the exit code
pub fn report_failure(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<ScaffoldError>() {
        Some(precondition) => {
            let _ = cliclack::outro_cancel(precondition.to_string());
        }
        None => {
            let _ = cliclack::log::error(format!("{:#}", err));
            let _ = cliclack::outro_cancel("Setup failed");
        }
    }
    1
}
