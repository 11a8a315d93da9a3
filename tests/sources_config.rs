// tests/sources_config.rs
use ai_daily_digest::config::{AiConfig, EmailConfig};
use ai_daily_digest::ingest::config::{load_sources_default, load_sources_from, SourcesConfig};
use std::{env, fs};

#[test]
fn parse_toml_and_json_paths() {
    let dir = tempfile::tempdir().unwrap();

    let p_toml = dir.path().join("sources.toml");
    fs::write(
        &p_toml,
        r#"
[reddit]
subreddits = [" MachineLearning ", "", "LocalLLaMA"]
limit = 3
"#,
    )
    .unwrap();
    let cfg = load_sources_from(&p_toml).unwrap();
    assert_eq!(cfg.reddit.subreddits, vec!["MachineLearning", "LocalLLaMA"]);
    assert_eq!(cfg.reddit.limit, 3);
    assert_eq!(cfg.github.url, SourcesConfig::default().github.url);

    let p_json = dir.path().join("sources.json");
    fs::write(&p_json, r#"{"timeout_secs": 3}"#).unwrap();
    let cj = load_sources_from(&p_json).unwrap();
    assert_eq!(cj.timeout_secs, 3);
}

#[test]
fn partial_arxiv_table_loads_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("sources.toml");
    fs::write(&p, "[arxiv]\nlimit = 5\n").unwrap();

    let cfg = load_sources_from(&p).unwrap();
    assert_eq!(cfg.arxiv.limit, 5);
    assert_eq!(cfg.arxiv.url, SourcesConfig::default().arxiv.url);
}

#[serial_test::serial]
#[test]
fn sources_default_uses_env_then_fallbacks() {
    // Isolate CWD so the repo's own config/ is not read.
    let old = env::current_dir().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    env::set_current_dir(tmp.path()).unwrap();
    env::remove_var("DIGEST_SOURCES_PATH");

    // 1) nothing -> built-in defaults
    assert_eq!(load_sources_default().unwrap(), SourcesConfig::default());

    // 2) ./config/sources.toml
    let cfg_dir = tmp.path().join("config");
    fs::create_dir_all(&cfg_dir).unwrap();
    fs::write(cfg_dir.join("sources.toml"), "timeout_secs = 7\n").unwrap();
    assert_eq!(load_sources_default().unwrap().timeout_secs, 7);

    // 3) env var wins
    let p_env = tmp.path().join("override.json");
    fs::write(&p_env, r#"{"timeout_secs": 2}"#).unwrap();
    env::set_var("DIGEST_SOURCES_PATH", p_env.display().to_string());
    assert_eq!(load_sources_default().unwrap().timeout_secs, 2);

    // 4) env var pointing nowhere is an error
    env::set_var("DIGEST_SOURCES_PATH", tmp.path().join("missing.toml"));
    assert!(load_sources_default().is_err());
    env::remove_var("DIGEST_SOURCES_PATH");

    env::set_current_dir(&old).unwrap();
}

#[serial_test::serial]
#[test]
fn ai_config_env_indirection_and_fallback() {
    let old = env::current_dir().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    env::set_current_dir(tmp.path()).unwrap();
    for v in ["AI_CONFIG_PATH", "AI_PROVIDER", "AI_MODEL", "AI_BASE_URL", "GEMINI_API_KEY"] {
        env::remove_var(v);
    }

    // No file, no key -> disabled env config.
    let cfg = AiConfig::load_default().unwrap();
    assert!(!cfg.enabled);
    assert_eq!(cfg.provider, "gemini");

    // File with "ENV" key reads GEMINI_API_KEY.
    let cfg_dir = tmp.path().join("config");
    fs::create_dir_all(&cfg_dir).unwrap();
    fs::write(
        cfg_dir.join("ai.json"),
        r#"{"enabled": true, "provider": "gemini", "api_key": "ENV"}"#,
    )
    .unwrap();
    env::set_var("GEMINI_API_KEY", "AIzaSyTESTKEY0000000");
    let cfg = AiConfig::load_default().unwrap();
    assert!(cfg.enabled);
    assert_eq!(cfg.api_key, "AIzaSyTESTKEY0000000");
    assert_eq!(cfg.masked_key(), "AIzaSyTE...0000");

    // Key unset -> still loads, but disabled.
    env::remove_var("GEMINI_API_KEY");
    let cfg = AiConfig::load_default().unwrap();
    assert!(!cfg.enabled);

    env::set_current_dir(&old).unwrap();
}

#[serial_test::serial]
#[test]
fn email_config_from_env() {
    for v in [
        "SMTP_SERVER",
        "SMTP_PORT",
        "SMTP_USERNAME",
        "SMTP_PASSWORD",
        "EMAIL_FROM",
        "EMAIL_TO",
    ] {
        env::remove_var(v);
    }
    assert!(EmailConfig::from_env().is_err());

    env::set_var("SMTP_USERNAME", "bot@example.com");
    env::set_var("SMTP_PASSWORD", "app-password-123456");
    env::set_var("EMAIL_TO", "reader@example.com");
    let cfg = EmailConfig::from_env().unwrap();
    assert_eq!(cfg.smtp_server, "smtp.gmail.com");
    assert_eq!(cfg.smtp_port, 587);
    assert_eq!(cfg.from_email, "bot@example.com");

    env::set_var("SMTP_PORT", "not-a-port");
    assert!(EmailConfig::from_env().is_err());

    for v in ["SMTP_PORT", "SMTP_USERNAME", "SMTP_PASSWORD", "EMAIL_TO"] {
        env::remove_var(v);
    }
}
