//! MSTest source synthesis.
//!
//! Rendering is pure string assembly: deterministic output for identical
//! inputs, no filesystem access, no timestamps.

use crate::TestStrategy;
use std::fmt::Write;

/// Inputs for one rendered test file.
pub struct TestTemplate<'a> {
    /// Name of the paired test project (namespace root).
    pub test_project: &'a str,
    /// Name of the DAL class under test.
    pub class_name: &'a str,
    /// Name of the method under test.
    pub method_name: &'a str,
    /// Typed parameters of the method, in order.
    pub parameters: &'a [(String, String)],
    /// Whether the method returns a value.
    pub returns_value: bool,
}

/// Renders the full text of a generated test file.
#[must_use]
pub fn render(template: &TestTemplate<'_>, strategy: TestStrategy) -> String {
    let TestTemplate {
        test_project,
        class_name,
        method_name,
        parameters,
        returns_value,
    } = template;

    let mut out = String::new();
    let _ = writeln!(out, "using Microsoft.VisualStudio.TestTools.UnitTesting;");
    let _ = writeln!(out);
    let _ = writeln!(out, "namespace {test_project}.{class_name}");
    let _ = writeln!(out, "{{");
    let _ = writeln!(out, "    /// <summary>");
    let _ = writeln!(out, "    /// Unit test for {class_name}.{method_name}.");
    let _ = writeln!(out, "    /// </summary>");
    let _ = writeln!(out, "    [TestClass]");
    let _ = writeln!(
        out,
        "    public class {class_name}_{method_name}Test : DalTest"
    );
    let _ = writeln!(out, "    {{");
    let _ = writeln!(out, "        /// <summary>");
    let _ = writeln!(out, "        /// Checks {method_name} against the database.");
    let _ = writeln!(out, "        /// </summary>");
    let _ = writeln!(out, "        [TestMethod]");
    let _ = writeln!(out, "        public void Check{method_name}()");
    let _ = writeln!(out, "        {{");

    if !parameters.is_empty() {
        let _ = writeln!(
            out,
            "            // TODO: provide representative values for the parameters."
        );
        for (ty, name) in parameters.iter() {
            let _ = writeln!(out, "            {ty} {name} = default;");
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(
        out,
        "            var dal = this.GetService<{class_name}>();"
    );

    let arguments = parameters
        .iter()
        .map(|(_, name)| name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    if *returns_value {
        let _ = writeln!(out, "            var result = dal.{method_name}({arguments});");
        match strategy {
            TestStrategy::Semantic => {
                let _ = writeln!(out, "            Assert.IsNotNull(result);");
            }
            TestStrategy::Snapshot => {
                let _ = writeln!(out, "            this.CheckSnapshot(result);");
            }
        }
    } else {
        let _ = writeln!(out, "            dal.{method_name}({arguments});");
    }

    let _ = writeln!(out, "        }}");
    let _ = writeln!(out, "    }}");
    let _ = writeln!(out, "}}");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample<'a>(parameters: &'a [(String, String)], returns_value: bool) -> TestTemplate<'a> {
        TestTemplate {
            test_project: "Chaine.ReferentielImplementation.Test",
            class_name: "DalReference",
            method_name: "LoadReferenceList",
            parameters,
            returns_value,
        }
    }

    #[test]
    fn semantic_render_shape() {
        let params = vec![("int".to_string(), "id".to_string())];
        let content = render(&sample(&params, true), TestStrategy::Semantic);
        assert!(content.contains("namespace Chaine.ReferentielImplementation.Test.DalReference"));
        assert!(content.contains("public class DalReference_LoadReferenceListTest : DalTest"));
        assert!(content.contains("public void CheckLoadReferenceList()"));
        assert!(content.contains("int id = default;"));
        assert!(content.contains("var result = dal.LoadReferenceList(id);"));
        assert!(content.contains("Assert.IsNotNull(result);"));
    }

    #[test]
    fn snapshot_render_uses_snapshot_check() {
        let content = render(&sample(&[], true), TestStrategy::Snapshot);
        assert!(content.contains("this.CheckSnapshot(result);"));
        assert!(!content.contains("Assert.IsNotNull"));
    }

    #[test]
    fn void_method_has_no_result_binding() {
        let content = render(&sample(&[], false), TestStrategy::Semantic);
        assert!(content.contains("dal.LoadReferenceList();"));
        assert!(!content.contains("var result"));
    }

    #[test]
    fn render_is_deterministic() {
        let params = vec![("string".to_string(), "code".to_string())];
        let a = render(&sample(&params, true), TestStrategy::Semantic);
        let b = render(&sample(&params, true), TestStrategy::Semantic);
        assert_eq!(a, b);
    }
}
