use letterbot_core::config::LetterBotConfig;
use letterbot_core::providers::{resolve_order, DEFAULT_PROVIDER};
use letterbot_types::ProviderName;

#[test]
fn test_parse_full_credentials_json() {
    // Full structure with every provider configured
    let json = r#"{
        "telegram": {
            "bot_token": "123456:test_token"
        },
        "pdf_service": {
            "base_url": "http://pdf.internal:8000"
        },
        "providers": {
            "order": "gemini,openai,groq,huggingface",
            "gemini": {
                "api_key": "gm_key",
                "model": "gemini-2.0-flash",
                "max_retries": 4,
                "backoff_cap_seconds": 90,
                "request_timeout_seconds": 20
            },
            "openai": {
                "api_key": "sk_key"
            },
            "groq": {
                "api_key": "gr_key",
                "model": "llama-3.1-8b-instant"
            },
            "huggingface": {
                "api_key": "hf_key"
            }
        }
    }"#;

    let config = LetterBotConfig::from_json_str(json).expect("Failed to parse config");

    assert_eq!(config.telegram.bot_token, "123456:test_token");
    assert_eq!(config.pdf_service.base_url, "http://pdf.internal:8000");

    assert_eq!(config.providers.order, "gemini,openai,groq,huggingface");
    assert_eq!(config.providers.gemini.api_key, "gm_key");
    assert_eq!(config.providers.gemini.max_retries, Some(4));
    assert_eq!(config.providers.gemini.backoff_cap_seconds, Some(90));
    assert_eq!(config.providers.gemini.request_timeout_seconds, Some(20));

    assert_eq!(config.providers.openai.api_key, "sk_key");
    assert_eq!(config.providers.openai.model, None, "model override is optional");
    assert_eq!(
        config.providers.groq.model.as_deref(),
        Some("llama-3.1-8b-instant")
    );
}

#[test]
fn test_minimal_config_degrades_to_defaults() {
    // Only the bot token is required; everything else has defaults
    let json = r#"{
        "telegram": { "token": "123456:test_token" }
    }"#;

    let config = LetterBotConfig::from_json_str(json).expect("Failed to parse config");

    assert_eq!(
        config.telegram.bot_token, "123456:test_token",
        "token alias should map to bot_token"
    );
    assert_eq!(
        config.pdf_service.base_url, "http://localhost:8000",
        "PDF service should have default value"
    );
    assert_eq!(config.providers.order, "gemini", "default order is the single default provider");
    assert_eq!(config.providers.gemini.api_key, "");
    assert_eq!(config.providers.gemini.max_retries, None);
}

#[test]
fn test_missing_bot_token_is_rejected() {
    let json = r#"{ "telegram": { "bot_token": "" } }"#;
    assert!(LetterBotConfig::from_json_str(json).is_err());
}

#[test]
fn test_unparseable_json_is_a_config_error() {
    assert!(LetterBotConfig::from_json_str("not json").is_err());
    assert!(LetterBotConfig::from_json_str("{}").is_err());
}

#[test]
fn test_configured_order_resolves_with_unknown_names_dropped() {
    let json = r#"{
        "telegram": { "bot_token": "t" },
        "providers": { "order": "groq, llama_farm, gemini" }
    }"#;

    let config = LetterBotConfig::from_json_str(json).unwrap();
    let order = resolve_order(&config.providers.order);
    assert_eq!(order, vec![ProviderName::Groq, ProviderName::Gemini]);
}

#[test]
fn test_unresolvable_order_substitutes_default_provider() {
    let json = r#"{
        "telegram": { "bot_token": "t" },
        "providers": { "order": "copilot" }
    }"#;

    let config = LetterBotConfig::from_json_str(json).unwrap();
    assert_eq!(resolve_order(&config.providers.order), vec![DEFAULT_PROVIDER]);
}
