//! create-rn-newarch - add React Native new architecture files to an existing app

use anyhow::Result;
use clap::Parser;
use newarch_core::product::upgrade_helper_url;
use newarch_core::templates::version::normalized_version;
use newarch_core::tui::CreateArgs;
use newarch_core::ProductConfig;
use std::path::PathBuf;

/// Product configuration for the new architecture scaffolder
#[derive(Clone)]
pub struct NewArchConfig;

impl ProductConfig for NewArchConfig {
    fn name(&self) -> &'static str {
        "create-rn-newarch"
    }

    fn display_name(&self) -> &'static str {
        "Create React Native New Architecture Files"
    }

    fn default_archive_url(&self) -> &'static str {
        "https://codeload.github.com/ahmetbicer/create-react-native-new-arch-files/tar.gz/master"
    }

    fn archive_url_env(&self) -> &'static str {
        "NEWARCH_ARCHIVE_URL"
    }

    fn target_react_native_version(&self) -> &'static str {
        "0.68.0-rc.3"
    }

    fn minimum_react_native_version(&self) -> &'static str {
        "0.68.0-rc.0"
    }

    fn cli_description(&self) -> &'static str {
        "Creates the files React Native's new architecture needs. You still have to apply the additional diff."
    }

    fn next_steps(&self, react_native_version: Option<&str>) -> Vec<String> {
        let from = react_native_version.and_then(normalized_version);
        vec![
            "Review the generated files with git diff".to_string(),
            format!(
                "Apply the remaining changes from the upgrade helper:\n      {}",
                upgrade_helper_url(from.as_deref(), self.target_react_native_version())
            ),
        ]
    }
}

#[derive(Parser, Debug)]
#[command(name = "create-rn-newarch")]
#[command(about = "Creates the files React Native's new architecture needs. You still have to apply the additional diff.")]
#[command(version)]
pub struct Args {
    /// Project root containing package.json (defaults to the current directory)
    #[arg(short = 'C', long = "project-dir")]
    pub project_dir: Option<PathBuf>,

    /// Local template directory to use instead of downloading the archive (offline use)
    #[arg(long = "template-dir")]
    pub template_dir: Option<PathBuf>,

    /// Android package name, e.g. com.acme.app (skips the prompt)
    #[arg(long = "package-name")]
    pub package_name: Option<String>,

    /// Main component name (skips the prompt)
    #[arg(long = "app-name")]
    pub app_name: Option<String>,

    /// YAML file listing placeholder tokens to replace
    #[arg(long)]
    pub placeholders: Option<PathBuf>,

    /// Accept default names without prompting (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,
}

impl From<Args> for CreateArgs {
    fn from(args: Args) -> Self {
        CreateArgs {
            project_dir: args.project_dir,
            template_dir: args.template_dir,
            package_name: args.package_name,
            app_name: args.app_name,
            placeholders: args.placeholders,
            yes: args.yes,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    // Help and version exit here, before anything touches the project
    let args = Args::parse();
    let config = NewArchConfig;

    let result = newarch_core::run(&config, args.into()).await;

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    if let Err(err) = result {
        let code = newarch_core::tui::report_failure(&err);
        std::process::exit(code);
    }

    Ok(())
}
