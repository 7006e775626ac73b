//! End-to-end heuristic validation: worked examples and result invariants
use std::sync::Arc;

use snippet_checker::validation::corrector;
use snippet_checker::{ProfileRegistry, Severity, ValidationResult, Validator, analyze};

fn validator() -> Validator {
    Validator::new(Arc::new(ProfileRegistry::builtin().expect("builtin profiles")), None)
}

/// Snippets exercising every rule family and rewrite, plus some clean code
const SAMPLES: &[(&str, &str)] = &[
    ("javascript", "funtion foo(){\n  retrun 1\n}"),
    ("javascript", "cosnt a = 1\nlte b = a == 2\nif a > b {\nconsole.log 'x'"),
    ("javascript", "function ok(a, b) {\n  return a === b;\n}\n"),
    ("python", "if x:\n    pritn(x);"),
    ("python", "def f(a)\n    elseif a&&true || false:\n        prnit(a)"),
    ("python", "def add(a, b):\n    return a + b\n"),
    ("java", "pubilc class foo {\n  public static void main() {\n    Sytem.out.println(1)\n  }"),
    ("java", "public class Main {\n  public static void main(String[] args) {}\n}"),
    ("cpp", "cout Hello;"),
    ("cpp", "#inlcude iostream\nint mian() {\n  cin x;\n"),
    ("cpp", "#include <iostream>\nint main() {\n  std::cout << 1;\n  return 0;\n}"),
    ("ruby", "funtion x\nputs 'hi' if x == 1"),
    ("", ""),
];

#[tokio::test]
async fn test_example_javascript_typos() {
    let result = validator()
        .validate("funtion foo(){\n  retrun 1\n}", "javascript")
        .await;

    assert!(result.has_errors);
    assert_eq!(result.error_count, 2);
    assert_eq!(result.warning_count, 0);
    assert_eq!(result.errors[0].line, 1);
    assert!(result.errors[0].message.contains("funtion"));
    assert_eq!(result.errors[1].line, 2);
    assert!(result.errors[1].message.contains("retrun"));
    assert_eq!(result.corrected_code, "function foo(){\n  return 1\n}");
    assert_eq!(
        result.explanation,
        "Found 2 error(s) and 0 warning(s) in your code."
    );
}

#[tokio::test]
async fn test_example_python_typo_and_semicolon() {
    let result = validator().validate("if x:\n    pritn(x);", "python").await;

    assert_eq!(result.error_count, 1);
    assert_eq!(result.warning_count, 1);
    assert_eq!(result.errors.len(), 2);
    assert!(result.errors.iter().all(|d| d.line == 2));
    assert_eq!(result.errors[0].severity, Severity::Error);
    assert_eq!(result.errors[1].severity, Severity::Warning);
    assert_eq!(result.corrected_code, "if x:\n    print(x);");
}

#[tokio::test]
async fn test_example_cpp_missing_stream_operator() {
    let result = validator().validate("cout Hello;", "cpp").await;

    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].severity, Severity::Error);
    assert!(result.errors[0].message.contains("<<"));
    assert_eq!(result.corrected_code, "cout Hello;");
}

#[tokio::test]
async fn test_warnings_only_explanation() {
    let result = validator().validate("x = 1;", "python").await;
    assert!(!result.has_errors);
    assert_eq!(
        result.explanation,
        "No critical errors, but found 1 warning(s)."
    );
}

#[tokio::test]
async fn test_counts_match_errors_for_all_samples() {
    let validator = validator();
    for (language, code) in SAMPLES {
        let result = validator.validate(code, language).await;
        let errors = result
            .errors
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count();
        let warnings = result
            .errors
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count();

        assert_eq!(result.error_count, errors, "{language}: {code:?}");
        assert_eq!(result.warning_count, warnings, "{language}: {code:?}");
        assert_eq!(result.has_errors, errors > 0, "{language}: {code:?}");
        assert!(result.is_consistent());
    }
}

#[test]
fn test_corrector_is_idempotent_for_every_profile() {
    let registry = ProfileRegistry::builtin().expect("builtin profiles");
    for id in registry.ids() {
        let profile = registry.get_profile(id);
        for (_, code) in SAMPLES {
            let once = corrector::apply(code, profile);
            let twice = corrector::apply(&once, profile);
            assert_eq!(once, twice, "profile {id} not idempotent on {code:?}");
        }
    }
}

#[test]
fn test_clean_code_is_not_rewritten() {
    let registry = ProfileRegistry::builtin().expect("builtin profiles");
    for (language, code) in [
        ("javascript", "function ok(a, b) {\n  return a === b;\n}\n"),
        ("python", "def add(a, b):\n    return a + b\n"),
        ("java", "public class Main {}"),
        ("cpp", "int main() { return 0; }"),
    ] {
        assert_eq!(corrector::apply(code, registry.get_profile(language)), code);
    }
}

#[tokio::test]
async fn test_unknown_language_routes_to_javascript() {
    let validator = validator();
    let registry = ProfileRegistry::builtin().expect("builtin profiles");
    let javascript = registry.get_profile("javascript");

    for language in ["ruby", "typescript", "Python", ""] {
        let code = "funtion f() {\nlet x = 1\n";
        let result = validator.validate(code, language).await;
        assert_eq!(result, analyze(code, javascript), "language {language:?}");
    }
}

#[tokio::test]
async fn test_correction_does_not_fix_structure() {
    // Corrected code still fails the brace balance check
    let validator = validator();
    let result = validator.validate("funtion f() {\n", "javascript").await;
    assert_eq!(result.corrected_code, "function f() {\n");

    let revalidated: ValidationResult = validator.validate(&result.corrected_code, "javascript").await;
    assert_eq!(revalidated.error_count, 1);
    assert!(revalidated.errors[0].message.starts_with("Unmatched curly braces"));
}
