use kuching::domain::BackendChoice;

#[test]
fn given_known_identifiers_when_parsed_then_case_is_ignored() {
    assert_eq!(BackendChoice::try_parse("gemini"), Some(BackendChoice::Gemini));
    assert_eq!(BackendChoice::try_parse("GEMINI"), Some(BackendChoice::Gemini));
    assert_eq!(BackendChoice::try_parse(" Groq "), Some(BackendChoice::Groq));
}

#[test]
fn given_unknown_identifier_when_parsed_then_none() {
    assert_eq!(BackendChoice::try_parse("unknown-vendor"), None);
    assert_eq!(BackendChoice::try_parse(""), None);
}

#[test]
fn given_no_choice_then_default_is_gemini() {
    assert_eq!(BackendChoice::default(), BackendChoice::Gemini);
    assert_eq!(BackendChoice::default().as_str(), "gemini");
}
