use std::io::Write;
use std::path::Path;

use super::*;

#[test]
fn missing_profile_is_terminal() {
    let err = load_profile(Path::new("/nonexistent/profile.txt")).unwrap_err();
    assert!(matches!(err, ProfileError::NotFound { .. }));
}

#[test]
fn empty_profile_is_terminal() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "   \n\t ").unwrap();

    let err = load_profile(file.path()).unwrap_err();
    assert!(matches!(err, ProfileError::Empty { .. }));
}

#[test]
fn valid_profile_loads() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "Data analyst with SQL and Python.").unwrap();

    let text = load_profile(file.path()).unwrap();
    assert!(text.contains("SQL"));
}

#[test]
fn summary_is_capped_and_owned() {
    let text = "x".repeat(5000);
    let summary = profile_summary(&text);
    // The summary outlives the document it was cut from.
    drop(text);
    assert_eq!(summary.chars().count(), 1500);
}

#[test]
fn extracts_known_skills_with_importance() {
    let meta = extract_metadata("Experienced in Python, SQL and Power BI reporting.");

    let python = meta.skills.iter().position(|s| s == "python").unwrap();
    assert_eq!(meta.skill_importance[python], 1.0);
    assert!(meta.skills.contains(&"sql".to_string()));
    assert!(meta.skills.contains(&"power bi".to_string()));
    assert_eq!(meta.skills.len(), meta.skill_importance.len());
}

#[test]
fn alternate_skill_spellings_collapse_to_one_entry() {
    let meta = extract_metadata("PowerBI dashboards; also power bi modelling.");
    let count = meta
        .skills
        .iter()
        .filter(|s| s.replace(' ', "") == "powerbi")
        .count();
    assert_eq!(count, 1);
}

#[test]
fn extracts_target_titles() {
    let meta = extract_metadata("Worked as a data analyst and backend developer.");
    assert!(meta.target_titles.contains(&"Analyst".to_string()));
    assert!(meta.target_titles.contains(&"Developer".to_string()));
    assert!(!meta.is_empty());
}

#[test]
fn no_recognizable_content_yields_empty_metadata() {
    let meta = extract_metadata("Baker specializing in sourdough.");
    assert!(meta.is_empty());
    assert!(meta.skills.is_empty());
}

#[test]
fn dynamic_persona_names_are_sanitized() {
    let personas = build_dynamic_personas(
        &["Data Analyst".to_string(), "BI / Reporting Specialist!".to_string()],
        72,
        25,
    );

    assert_eq!(personas.len(), 2);
    assert_eq!(personas[0].name, "Data_Analyst");
    assert_eq!(personas[1].name, "BI_Reporting_Specialist");
}

#[test]
fn dynamic_persona_terms_quote_and_filter() {
    let personas = build_dynamic_personas(&["Data Analyst".to_string()], 48, 10);

    assert_eq!(
        personas[0].search_term,
        "(\"Data Analyst\") -Senior -Lead -Manager -Director -Principal"
    );
    assert_eq!(personas[0].max_age_hours, 48);
    assert_eq!(personas[0].max_results, 10);
    assert!(personas[0].is_valid());
}

#[test]
fn symbol_only_titles_are_dropped() {
    let personas = build_dynamic_personas(&["!!!".to_string()], 72, 25);
    assert!(personas.is_empty());
}

#[test]
fn default_personas_are_valid() {
    let personas = default_personas(72, 25);
    assert!(!personas.is_empty());
    assert!(personas.iter().all(PersonaSpec::is_valid));
    assert!(personas.iter().all(|p| p.search_term.contains("-Senior")));
}
