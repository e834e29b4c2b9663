//! Command dispatch

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::services::{HierarchyReport, TreeRequest};
use crate::cli::args::{Cli, Commands, ConfigCommands, OutputFormat};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::cli::render::{render_indent, render_toml, render_tree};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{TermId, VocabularyId, UNBOUNDED, VIRTUAL_ROOT};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let config_dir = match &cli.config_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()
            .map_err(|e| InfraError::io("determine current directory", e))?,
    };
    let settings = Settings::load(Some(&config_dir))?;
    debug!("settings: {:?}", settings);

    match &cli.command {
        Some(Commands::Tree {
            vocabulary,
            root,
            max_depth,
            published_only,
            all,
            format,
            output,
        }) => {
            let container = container(cli, settings)?;
            let published_only = !*all && (*published_only || container.settings.published_only);
            let request = TreeRequest::new(*vocabulary)
                .root(*root)
                .max_depth(max_depth.or(container.settings.max_depth).unwrap_or(UNBOUNDED))
                .published_only(published_only);
            _tree(&container, &request, *format, output.as_deref())
        }
        Some(Commands::Check { vocabularies }) => _check(&container(cli, settings)?, vocabularies),
        Some(Commands::Vocabularies) => _vocabularies(&container(cli, settings)?),
        Some(Commands::Config { command }) => _config(command, &settings, &config_dir),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Ok(()),
    }
}

fn container(cli: &Cli, settings: Settings) -> CliResult<ServiceContainer> {
    let terms_file: PathBuf = cli
        .file
        .clone()
        .or_else(|| settings.terms_file.clone())
        .ok_or_else(|| {
            CliError::Usage("no term catalog: pass --file or set `terms_file` in settings".into())
        })?;
    debug!("terms_file: {}", terms_file.display());
    Ok(ServiceContainer::new(settings, terms_file))
}

fn vocabulary_title(container: &ServiceContainer, vocabulary: VocabularyId, root: TermId) -> CliResult<String> {
    let name = container
        .taxonomy
        .vocabularies()?
        .into_iter()
        .find(|v| v.id == vocabulary)
        .map(|v| v.name)
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| format!("vocabulary {}", vocabulary));
    Ok(match root {
        VIRTUAL_ROOT => name,
        _ => format!("{} / {}", name, root),
    })
}

#[instrument(skip(container))]
fn _tree(
    container: &ServiceContainer,
    request: &TreeRequest,
    format: OutputFormat,
    output_path: Option<&Path>,
) -> CliResult<()> {
    let nodes = container.taxonomy.tree(request)?;
    if nodes.is_empty() {
        output::warning(&format!(
            "no terms below {} in vocabulary {}",
            request.root, request.vocabulary_id
        ));
    }

    let rendered = match format {
        OutputFormat::Indent => render_indent(&nodes, &container.settings.indent),
        OutputFormat::Tree => {
            let title = vocabulary_title(container, request.vocabulary_id, request.root)?;
            render_tree(&title, &nodes).to_string()
        }
        OutputFormat::Toml => render_toml(&nodes)?,
    };

    match output_path {
        Some(path) => {
            container
                .fs
                .write(path, &rendered)
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::success(&format!("{} nodes written to {}", nodes.len(), path.display()));
        }
        None => print!("{}", rendered),
    }
    Ok(())
}

#[instrument(skip(container))]
fn _check(container: &ServiceContainer, vocabularies: &[VocabularyId]) -> CliResult<()> {
    let known: Vec<VocabularyId> = container
        .taxonomy
        .vocabularies()?
        .into_iter()
        .map(|v| v.id)
        .collect();
    let unknown = vocabularies.iter().filter(|id| !known.contains(id)).join(", ");
    if !unknown.is_empty() {
        return Err(CliError::InvalidArgs(format!("unknown vocabularies: {}", unknown)));
    }
    let ids = if vocabularies.is_empty() {
        known
    } else {
        vocabularies.to_vec()
    };

    let reports = container.taxonomy.check_all(&ids)?;
    for report in &reports {
        print_report(report);
    }

    let unhealthy = reports.iter().filter(|r| !r.is_healthy()).count();
    if unhealthy > 0 {
        return Err(CliError::Unhealthy(unhealthy));
    }
    Ok(())
}

fn print_report(report: &HierarchyReport) {
    output::header(&format!("vocabulary {}", report.vocabulary_id));
    output::detail(&format!(
        "{} terms, {} top-level, {} nodes when flattened",
        report.terms, report.top_level, report.occurrences
    ));
    if let Some(deepest) = report.deepest {
        output::detail(&format!("deepest level: {}", deepest));
    }
    if !report.multi_parent.is_empty() {
        output::detail(&format!(
            "multi-parent terms: {}",
            report.multi_parent.iter().join(", ")
        ));
    }
    if !report.dangling_parents.is_empty() {
        output::failure(&format!(
            "dangling parents: {}",
            report.dangling_parents.iter().join(", ")
        ));
    }
    if !report.unreachable.is_empty() {
        output::failure(&format!(
            "unreachable terms: {}",
            report.unreachable.iter().join(", ")
        ));
    }
    match &report.problem {
        Some(problem) => output::failure(problem),
        None if report.is_healthy() => output::success("hierarchy ok"),
        None => {}
    }
}

fn _vocabularies(container: &ServiceContainer) -> CliResult<()> {
    for v in container.taxonomy.vocabularies()? {
        output::info(&format!("{}\t{}\t{} terms", v.id, v.name, v.terms));
    }
    Ok(())
}

fn _config(command: &ConfigCommands, settings: &Settings, config_dir: &Path) -> CliResult<()> {
    match command {
        ConfigCommands::Show => output::info(&settings.to_toml()?),
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::info(&format!("global: {}", path.display())),
                None => output::warning("no global config directory on this platform"),
            }
            output::info(&format!("local:  {}", local_config_path(config_dir).display()));
        }
    }
    Ok(())
}
