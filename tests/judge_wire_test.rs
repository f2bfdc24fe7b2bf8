//! Tests for judge payloads and prompt construction.

use word_battle::{
    JudgeErrorKind, JudgeRequest, JudgeResult, Language, Verdict, locale_directive, system_prompt,
};

const REPLY: &str = r#"{
 "explication_pour_ou_contre": "L'insecticide tue les fourmis",
 "mot_precedent": "Fourmi",
 "mot_soumis_par_utilisateur": "Insecticide",
 "smiley_correspondant_au_mot": "🧪",
 "mot_deja_utiliser_precedement": false,
 "succes": true
}"#;

#[test]
fn test_parse_plain_reply() {
    let verdict = Verdict::parse(REPLY).expect("parse failed");
    assert!(verdict.success);
    assert_eq!(verdict.emoji, "🧪");
    assert_eq!(verdict.previous_word, "Fourmi");

    let result = JudgeResult::from(verdict);
    assert!(result.accepted);
    assert!(!result.was_duplicate);
    assert_eq!(result.explanation, "L'insecticide tue les fourmis");
}

#[test]
fn test_parse_fenced_reply() {
    let fenced = format!("Voici ma réponse :\n```json\n{}\n```", REPLY);
    let verdict = Verdict::parse(&fenced).expect("parse failed");
    assert_eq!(verdict.submitted_word, "Insecticide");
}

#[test]
fn test_optional_fields_default() {
    let minimal = r#"{"explication_pour_ou_contre": "Already used", "smiley_correspondant_au_mot": "🔁", "succes": false}"#;
    let verdict = Verdict::parse(minimal).expect("parse failed");
    assert!(!verdict.already_used);
    assert_eq!(verdict.previous_word, "");
}

#[test]
fn test_missing_success_is_invalid_response() {
    let reply = r#"{"explication_pour_ou_contre": "?", "smiley_correspondant_au_mot": "❓"}"#;
    let err = Verdict::parse(reply).unwrap_err();
    assert_eq!(err.kind, JudgeErrorKind::InvalidResponse);
}

#[test]
fn test_prose_without_object_is_invalid_response() {
    let err = Verdict::parse("I cannot judge that.").unwrap_err();
    assert_eq!(err.kind, JudgeErrorKind::InvalidResponse);

    let err = Verdict::parse("} backwards {").unwrap_err();
    assert_eq!(err.kind, JudgeErrorKind::InvalidResponse);
}

#[test]
fn test_blank_explanation_is_invalid_response() {
    let reply = r#"{"explication_pour_ou_contre": "  ", "smiley_correspondant_au_mot": "🧪", "succes": true}"#;
    let err = Verdict::parse(reply).unwrap_err();
    assert_eq!(err.kind, JudgeErrorKind::InvalidResponse);
}

#[test]
fn test_request_uses_camel_case_and_defaults_language() {
    let body = r#"{"word": "Feu", "previousWords": ["Fourmi"], "currentWord": "Fourmi"}"#;
    let request: JudgeRequest = serde_json::from_str(body).expect("parse failed");
    assert_eq!(request.language, Language::Fr);
    assert_eq!(request.previous_words, vec!["Fourmi".to_string()]);

    let json = serde_json::to_value(&request).expect("serialize failed");
    assert_eq!(json["currentWord"], "Fourmi");
    assert_eq!(json["language"], "fr");
}

#[test]
fn test_unsupported_language_does_not_parse() {
    let body = r#"{"word": "Fire", "previousWords": [], "currentWord": "Ant", "language": "pt"}"#;
    assert!(serde_json::from_str::<JudgeRequest>(body).is_err());
}

#[test]
fn test_verdict_from_result_echoes_request() {
    let request = JudgeRequest::new(
        "Insecticide".to_string(),
        vec!["Fourmi".to_string()],
        "Fourmi".to_string(),
        Language::Fr,
    );
    let result = JudgeResult::new(true, "Tue".to_string(), "🧪".to_string(), false);
    let verdict = Verdict::from_result(&result, &request);
    assert_eq!(verdict.previous_word, "Fourmi");
    assert_eq!(verdict.submitted_word, "Insecticide");

    let json = serde_json::to_value(&verdict).expect("serialize failed");
    assert_eq!(json["succes"], true);
    assert_eq!(json["mot_deja_utiliser_precedement"], false);
    assert_eq!(json["smiley_correspondant_au_mot"], "🧪");
}

#[test]
fn test_prompt_carries_locale_context_and_format() {
    let request = JudgeRequest::new(
        "Lion".to_string(),
        vec!["Ant".to_string(), "Anteater".to_string()],
        "Anteater".to_string(),
        Language::En,
    );
    let prompt = system_prompt(&request);
    assert!(prompt.starts_with(locale_directive(Language::En)));
    assert!(prompt.contains("[\"Anteater\"]"));
    assert!(prompt.contains(r#"["Ant","Anteater"]"#));
    assert!(prompt.contains("\"succes\""));
    assert!(prompt.contains("Duplicate"));
    assert!(!prompt.contains("Lion"));
}

#[test]
fn test_every_language_has_its_own_directive() {
    let directives: Vec<&str> = [
        Language::Fr,
        Language::En,
        Language::De,
        Language::Es,
        Language::It,
    ]
    .into_iter()
    .map(locale_directive)
    .collect();
    for (i, a) in directives.iter().enumerate() {
        for b in &directives[i + 1..] {
            assert_ne!(a, b);
        }
    }
}
