//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for safe, sandboxed env var and cwd manipulation.

use figment::{
    Figment, Jail,
    providers::{Format, Serialized, Toml},
};
use ms_config::{EmbeddingProviderKind, MailsortConfig};

#[test]
fn loads_sections_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[azure_openai]
endpoint = "https://res.openai.azure.com"
api_key = "toml-key"
embeddings_deployment = "text-embedding-3-small"
intent_deployment = "gpt-4o-mini"

[embedding]
provider = "azure"
concurrency = 8

[clustering]
min_cluster_size = 6
keywords_per_cluster = 3

[intent]
max_chars = 4000
"#,
        )?;

        let config: MailsortConfig = Figment::from(Serialized::defaults(MailsortConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.azure_openai.api_key, "toml-key");
        assert_eq!(config.azure_openai.api_version, "2024-02-15-preview");
        assert!(config.azure_openai.embeddings_configured());
        assert!(config.azure_openai.intent_configured());
        assert_eq!(config.embedding.provider, EmbeddingProviderKind::Azure);
        assert_eq!(config.embedding.concurrency, 8);
        assert_eq!(config.embedding.offline_dimension, 32);
        assert_eq!(config.clustering.min_cluster_size, 6);
        assert_eq!(config.clustering.keywords_per_cluster, 3);
        assert_eq!(config.clustering.max_features, 1000);
        assert_eq!(config.intent.max_chars, 4000);
        Ok(())
    });
}

#[test]
fn project_local_file_is_picked_up() {
    Jail::expect_with(|jail| {
        jail.create_dir(".mailsort")?;
        jail.create_file(
            ".mailsort/config.toml",
            r#"
[embedding]
provider = "offline"
offline_dimension = 64

[server]
port = 9100
"#,
        )?;

        let config = MailsortConfig::load().expect("config loads");
        assert_eq!(config.embedding.provider, EmbeddingProviderKind::Offline);
        assert_eq!(config.embedding.offline_dimension, 64);
        assert_eq!(config.server.port, 9100);
        Ok(())
    });
}

#[test]
fn invalid_provider_name_fails_extraction() {
    Jail::expect_with(|jail| {
        jail.create_dir(".mailsort")?;
        jail.create_file(
            ".mailsort/config.toml",
            r#"
[embedding]
provider = "quantum"
"#,
        )?;

        assert!(MailsortConfig::load().is_err());
        Ok(())
    });
}
