//! Orchestration pipeline.
//!
//! The only component with side effects: it reads documents, drives the
//! parser, classifier, rule engine, and generator, writes artifacts, and
//! logs progress. Documents are processed on a rayon work-stealing pool
//! with no shared mutable state; a failure inside one document is logged
//! and never observable to its siblings.

use crate::workspace::{Project, Solution};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use strata_core::classify;
use strata_core::source::facts;
use strata_core::{
    AnalysisResult, CSharpParser, Config, Diagnostic, DocumentContext, Engine, RuleContext,
    SemanticIndex, SyntaxTree,
};
use strata_gen::TestStrategy;

/// Builds the engine with all built-in rules enabled by configuration.
#[must_use]
pub fn build_engine(config: &Config) -> Engine {
    let mut engine = Engine::new();
    for rule in strata_rules::built_in_rules() {
        if config.is_rule_enabled(rule.descriptor().name) {
            engine.register_box(rule);
        } else {
            tracing::debug!("Rule disabled by config: {}", rule.descriptor().name);
        }
    }
    engine
}

/// Parses every document of a project in parallel.
///
/// Unreadable or unparseable documents are logged and abandoned; the
/// remaining documents proceed normally.
fn parse_documents(project: &Project) -> Vec<(PathBuf, SyntaxTree)> {
    project
        .documents
        .par_iter()
        .filter_map(|path| {
            let content = match std::fs::read_to_string(path) {
                Ok(content) => content,
                Err(e) => {
                    tracing::warn!("Failed to read {}: {}", path.display(), e);
                    return None;
                }
            };
            match CSharpParser::new().parse(content) {
                Ok(tree) => {
                    if tree.has_parse_errors() {
                        tracing::debug!("Partial parse for {}", path.display());
                    }
                    Some((path.clone(), tree))
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}", path.display(), e);
                    None
                }
            }
        })
        .collect()
}

/// Applies configured severity overrides after the engine has run.
fn apply_severity_overrides(config: &Config, diagnostics: &mut [Diagnostic]) {
    for diagnostic in diagnostics {
        if let Some(severity) = config.rule_severity(&diagnostic.rule) {
            diagnostic.severity = severity;
        }
    }
}

/// Runs rule analysis over every business project of a solution.
#[must_use]
pub fn run_check(solution: &Solution, config: &Config) -> AnalysisResult {
    let conventions = &config.conventions;
    let engine = build_engine(config);
    let mut result = AnalysisResult::new();

    for project in &solution.projects {
        if !classify::is_business_assembly(&project.name, conventions) {
            tracing::debug!("Skipping non-business project: {}", project.name);
            continue;
        }

        tracing::info!(
            "Analyzing {} ({} documents)",
            project.name,
            project.documents.len()
        );

        let parsed = parse_documents(project);
        let index = SemanticIndex::from_trees(parsed.iter().map(|(_, tree)| tree));

        let diagnostics: Vec<Diagnostic> = parsed
            .par_iter()
            .flat_map_iter(|(path, tree)| {
                let document =
                    DocumentContext::new(path, tree.source(), &project.name, &solution.root);
                let ctx = RuleContext {
                    document: &document,
                    tree,
                    index: &index,
                    conventions,
                };
                engine.run(&ctx)
            })
            .collect();

        result.documents_checked += parsed.len();
        result.diagnostics.extend(diagnostics);
    }

    apply_severity_overrides(config, &mut result.diagnostics);
    result.sort();
    result
}

/// Outcome of a generation run.
#[derive(Debug, Default)]
pub struct GenerationSummary {
    /// Artifacts written by this run.
    pub written: Vec<PathBuf>,
    /// Destinations skipped because a file already existed.
    pub skipped_existing: Vec<PathBuf>,
    /// Business projects skipped for want of a paired test project.
    pub skipped_projects: Vec<String>,
}

/// Generates and persists test artifacts for every qualifying method of
/// every business project with a paired test project.
#[must_use]
pub fn run_generate(
    solution: &Solution,
    config: &Config,
    strategy: TestStrategy,
) -> GenerationSummary {
    let conventions = &config.conventions;
    let mut summary = GenerationSummary::default();

    for project in &solution.projects {
        if !classify::is_business_assembly(&project.name, conventions) {
            continue;
        }

        let Some(test_project) = solution.test_project_for(&project.name, conventions) else {
            tracing::info!(
                "No paired test project for {}; skipping generation",
                project.name
            );
            summary.skipped_projects.push(project.name.clone());
            continue;
        };

        // Cheap gate: nothing to do for projects without DAL documents.
        if !project
            .documents
            .iter()
            .any(|d| classify::is_dal_document(d, conventions))
        {
            continue;
        }

        let parsed = parse_documents(project);
        let index = SemanticIndex::from_trees(parsed.iter().map(|(_, tree)| tree));
        let test_dir = test_project.dir.clone();
        let test_name = test_project.name.clone();

        let outcomes: Vec<(PathBuf, bool)> = parsed
            .par_iter()
            .filter(|(path, _)| classify::is_dal_document(path, conventions))
            .flat_map_iter(|(path, tree)| {
                tracing::debug!("Evaluating generation for {}", path.display());
                generate_for_document(tree, &index, conventions, strategy, &test_dir, &test_name)
            })
            .collect();

        for (destination, written) in outcomes {
            if written {
                summary.written.push(destination);
            } else {
                summary.skipped_existing.push(destination);
            }
        }
    }

    summary.written.sort();
    summary.skipped_existing.sort();
    summary
}

/// Generates and writes artifacts for every DAL class of one document.
fn generate_for_document(
    tree: &SyntaxTree,
    index: &SemanticIndex,
    conventions: &strata_core::Conventions,
    strategy: TestStrategy,
    test_dir: &Path,
    test_name: &str,
) -> Vec<(PathBuf, bool)> {
    let mut outcomes = Vec::new();
    let classes =
        facts::descendants(tree.root()).filter(|n| n.kind() == "class_declaration");

    for class in classes {
        for method in strata_gen::eligible_methods(class, tree, index, conventions) {
            let Some(artifact) = strata_gen::generate(method, class, strategy, tree, test_name)
            else {
                continue;
            };
            let destination = test_dir.join(&artifact.folder).join(&artifact.file_name);
            match write_artifact(&destination, &artifact.content) {
                Ok(true) => {
                    tracing::info!("{}/{} generated", artifact.folder, artifact.file_name);
                    outcomes.push((destination, true));
                }
                Ok(false) => {
                    tracing::debug!("Already exists, skipping: {}", destination.display());
                    outcomes.push((destination, false));
                }
                Err(e) => {
                    tracing::warn!("Failed to write {}: {}", destination.display(), e);
                }
            }
        }
    }
    outcomes
}

/// Writes an artifact, creating intermediate directories on demand.
///
/// Returns `Ok(true)` when the file was written and `Ok(false)` when the
/// destination already existed — never an error, per the idempotence
/// contract. Concurrent directory creation is tolerated as a no-op.
///
/// # Errors
///
/// Returns an IO error only for genuine write failures.
pub fn write_artifact(path: &Path, content: &str) -> std::io::Result<bool> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if path.exists() {
        return Ok(false);
    }
    std::fs::write(path, content)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use strata_core::Severity;

    const DAL_SOURCE: &str = r#"
namespace Chaine.Referentiel
{
    [RegisterImpl]
    public class DalReference
    {
        private readonly IConnectionPool _pool;

        public object LoadReferenceList(int id)
        {
            return GetBroker<Reference>().FindAll(id);
        }

        public int CountCached()
        {
            return 0;
        }
    }
}
"#;

    fn touch(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("mkdir failed");
        }
        fs::write(path, content).expect("write failed");
    }

    fn sample_solution(with_test_project: bool) -> tempfile::TempDir {
        let dir = tempfile::tempdir().expect("tempdir failed");
        let root = dir.path();
        let project = "Chaine.ReferentielImplementation";
        touch(
            &root.join(format!("{project}/{project}.csproj")),
            "<Project />",
        );
        touch(
            &root.join(format!("{project}/DAL.Implementation/DalReference.cs")),
            DAL_SOURCE,
        );
        if with_test_project {
            touch(
                &root.join(format!("{project}.Test/{project}.Test.csproj")),
                "<Project />",
            );
        }
        dir
    }

    fn load(dir: &tempfile::TempDir) -> Solution {
        Solution::load(dir.path(), &["bin".to_string(), "obj".to_string()]).expect("load failed")
    }

    #[test]
    fn check_reports_uninitialized_readonly_field() {
        let dir = sample_solution(true);
        let solution = load(&dir);
        let result = run_check(&solution, &Config::default());

        assert_eq!(result.documents_checked, 1);
        let warnings: Vec<_> = result
            .diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .collect();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].rule, "uninitialized-readonly-field");

        // The hidden coverage signal fires for the accessor method.
        let hidden: Vec<_> = result
            .diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Hidden)
            .collect();
        assert_eq!(hidden.len(), 1);
    }

    #[test]
    fn check_ignores_non_business_projects() {
        let dir = tempfile::tempdir().expect("tempdir failed");
        let root = dir.path();
        touch(&root.join("Chaine.Web/Chaine.Web.csproj"), "<Project />");
        touch(
            &root.join("Chaine.Web/DAL.Implementation/DalReference.cs"),
            DAL_SOURCE,
        );
        let solution = load(&dir);
        let result = run_check(&solution, &Config::default());
        assert_eq!(result.documents_checked, 0);
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn generation_is_idempotent() {
        let dir = sample_solution(true);
        let solution = load(&dir);
        let config = Config::default();

        let first = run_generate(&solution, &config, TestStrategy::Semantic);
        assert_eq!(first.written.len(), 1);
        assert!(first.skipped_existing.is_empty());
        let destination = &first.written[0];
        assert!(destination.ends_with(
            "Chaine.ReferentielImplementation.Test/DalReference/DalReference_LoadReferenceListTest.cs"
        ));
        let content = fs::read_to_string(destination).expect("read failed");
        assert!(content.contains("[TestClass]"));

        let second = run_generate(&solution, &config, TestStrategy::Semantic);
        assert!(second.written.is_empty());
        assert_eq!(second.skipped_existing.len(), 1);
        let unchanged = fs::read_to_string(destination).expect("read failed");
        assert_eq!(content, unchanged);
    }

    #[test]
    fn generation_skips_projects_without_test_pair() {
        let dir = sample_solution(false);
        let solution = load(&dir);
        let summary = run_generate(&solution, &Config::default(), TestStrategy::Semantic);

        assert!(summary.written.is_empty());
        assert_eq!(
            summary.skipped_projects,
            vec!["Chaine.ReferentielImplementation".to_string()]
        );
    }

    #[test]
    fn generation_ignores_non_dal_classes() {
        let dir = tempfile::tempdir().expect("tempdir failed");
        let root = dir.path();
        let project = "Chaine.ReferentielImplementation";
        touch(
            &root.join(format!("{project}/{project}.csproj")),
            "<Project />",
        );
        // Same body, but the class is unmarked: not a DAL implementation.
        touch(
            &root.join(format!("{project}/DAL.Implementation/DalReference.cs")),
            r"
public class DalReference {
    public object Load() { return GetBroker<A>(); }
}
",
        );
        touch(
            &root.join(format!("{project}.Test/{project}.Test.csproj")),
            "<Project />",
        );
        let solution = load(&dir);
        let summary = run_generate(&solution, &Config::default(), TestStrategy::Semantic);
        assert!(summary.written.is_empty());
    }

    #[test]
    fn write_artifact_never_overwrites() {
        let dir = tempfile::tempdir().expect("tempdir failed");
        let path = dir.path().join("Folder/Test.cs");

        assert!(write_artifact(&path, "first").expect("write failed"));
        assert!(!write_artifact(&path, "second").expect("write failed"));
        assert_eq!(fs::read_to_string(&path).expect("read failed"), "first");
    }

    #[test]
    fn severity_override_applies_after_run() {
        let dir = sample_solution(true);
        let solution = load(&dir);
        let config = Config::parse(
            "[rules.uninitialized-readonly-field]\nseverity = \"error\"\n",
        )
        .expect("config parse failed");

        let result = run_check(&solution, &config);
        assert!(result.has_errors());
    }
}
