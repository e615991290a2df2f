use clap::{Parser, Subcommand};
use derm_core::{
    normalise_model_label, resolve_examination_location, validate_diagnosis_code,
    CodeLabelRegistry, DevProxyConfig, Domain,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "derm")]
#[command(about = "Dermatology code vocabulary CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the display label for a code
    Label {
        /// Vocabulary the code belongs to (disease or location)
        domain: Domain,
        /// Code to look up (e.g. MEL, SC)
        code: String,
    },
    /// List the selectable options in display order
    Options {
        /// Vocabulary to list (disease or location)
        domain: Domain,
        /// Print a JSON array instead of tab-separated lines
        #[arg(long)]
        json: bool,
    },
    /// Map a raw model label to a disease code
    Normalise {
        /// Label as reported by the classification model
        raw: String,
    },
    /// Resolve the location recorded for an examination
    Location {
        /// Location code (defaults to CH when omitted)
        code: Option<String>,
    },
    /// Validate a diagnosis result code
    Diagnosis {
        /// Diagnosis code (aliases are resolved)
        code: String,
    },
    /// Print the development proxy configuration as JSON
    Proxy,
    /// Summarise the vocabulary and its aliases
    Validate,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("derm=info".parse()?))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("Use 'derm --help' for commands");
        return Ok(());
    };

    // Built once and lent to whichever command runs.
    let registry = CodeLabelRegistry::standard()?;
    tracing::debug!("code label registry ready");

    let output = run(&registry, command)?;
    println!("{output}");

    Ok(())
}

fn run(registry: &CodeLabelRegistry, command: Commands) -> anyhow::Result<String> {
    let output = match command {
        Commands::Label { domain, code } => {
            let code = code.trim();
            if registry.label_for(domain, code).is_none() {
                tracing::info!(%domain, code, "no label for code, showing it as is");
            }
            registry.display(domain, code).to_owned()
        }
        Commands::Options { domain, json } => {
            let options = registry.options(domain);
            if json {
                serde_json::to_string_pretty(options.as_slice())?
            } else {
                options
                    .iter()
                    .map(|entry| format!("{}\t{}", entry.code, entry.label))
                    .collect::<Vec<_>>()
                    .join("\n")
            }
        }
        Commands::Normalise { raw } => match normalise_model_label(&raw) {
            Some(code) => format!(
                "{}\t{}",
                code,
                registry.disease_display_with_code(code.as_str())
            ),
            None => format!("Could not normalise model label '{raw}'"),
        },
        Commands::Location { code } => {
            let code = resolve_examination_location(registry, code.as_deref())?;
            format!("{}\t{}", code, registry.display_location(code.as_str()))
        }
        Commands::Diagnosis { code } => {
            let code = validate_diagnosis_code(registry, &code)?;
            format!("{}\t{}", code, registry.display_disease(code.as_str()))
        }
        Commands::Proxy => {
            let config = proxy_config(|key| std::env::var(key).ok())?;
            serde_json::to_string_pretty(&config)?
        }
        Commands::Validate => summarise(registry),
    };

    Ok(output)
}

fn proxy_config(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<DevProxyConfig> {
    let config = DevProxyConfig::from_env_values(
        var("DERM_PROXY_PREFIX"),
        var("DERM_PROXY_TARGET"),
        var("DERM_PROXY_CHANGE_ORIGIN"),
    )?;
    Ok(config)
}

fn summarise(registry: &CodeLabelRegistry) -> String {
    let mut lines = Vec::new();
    for domain in [Domain::Disease, Domain::Location] {
        let table = registry.table(domain);
        lines.push(format!(
            "{domain}: {} codes, {} options",
            table.len(),
            registry.options(domain).len()
        ));
        for (alias, target) in table.aliases() {
            lines.push(format!("  alias {alias} -> {target}"));
        }
        let offered: Vec<_> = registry.options(domain).codes().collect();
        for (code, _) in table.entries() {
            if !offered.contains(&code) && !table.is_alias(code.as_str()) {
                lines.push(format!("  not offered: {code}"));
            }
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> CodeLabelRegistry {
        CodeLabelRegistry::standard().expect("registry")
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn domain_argument_is_case_insensitive() {
        let cli = Cli::try_parse_from(["derm", "label", "Disease", "MEL"]).expect("parse");
        assert!(matches!(
            cli.command,
            Some(Commands::Label { domain: Domain::Disease, ref code }) if code == "MEL"
        ));

        let cli = Cli::try_parse_from(["derm", "options", "LOCATION", "--json"]).expect("parse");
        assert!(matches!(
            cli.command,
            Some(Commands::Options {
                domain: Domain::Location,
                json: true
            })
        ));

        let err = match Cli::try_parse_from(["derm", "label", "organ", "MEL"]) {
            Ok(_) => panic!("unknown domain should be rejected"),
            Err(err) => err,
        };
        assert!(err.to_string().contains("unknown domain 'organ'"));
    }

    #[test]
    fn label_prints_label_or_placeholder() {
        let registry = registry();
        let out = run(
            &registry,
            Commands::Label {
                domain: Domain::Disease,
                code: "MEL".into(),
            },
        )
        .expect("label");
        assert_eq!(out, "Меланома");

        let out = run(
            &registry,
            Commands::Label {
                domain: Domain::Location,
                code: "QQ".into(),
            },
        )
        .expect("unknown code is not an error");
        assert_eq!(out, "QQ");
    }

    #[test]
    fn options_as_lines_and_json() {
        let registry = registry();
        let out = run(
            &registry,
            Commands::Options {
                domain: Domain::Disease,
                json: false,
            },
        )
        .expect("options");
        let first = out.lines().next().expect("first line");
        assert_eq!(first, "NV\tМеланоцитарные невусы");
        assert_eq!(out.lines().count(), 7);

        let out = run(
            &registry,
            Commands::Options {
                domain: Domain::Location,
                json: true,
            },
        )
        .expect("json options");
        let parsed: serde_json::Value = serde_json::from_str(&out).expect("valid json");
        assert_eq!(parsed.as_array().map(Vec::len), Some(15));
        assert_eq!(parsed[14]["code"], "UK");
    }

    #[test]
    fn normalise_reports_code_and_display() {
        let out = run(
            &registry(),
            Commands::Normalise {
                raw: "basal_cell_carcinoma".into(),
            },
        )
        .expect("normalise");
        assert_eq!(out, "BCC\tБазально-клеточная карцинома (BCC)");

        let out = run(
            &registry(),
            Commands::Normalise {
                raw: "psoriasis".into(),
            },
        )
        .expect("unknown label is reported");
        assert!(out.contains("Could not normalise"));
    }

    #[test]
    fn location_defaults_and_rejects_unknown() {
        let out = run(&registry(), Commands::Location { code: None }).expect("default");
        assert_eq!(out, "CH\tГрудь");

        let err = run(
            &registry(),
            Commands::Location {
                code: Some("ZZ".into()),
            },
        )
        .expect_err("unknown location");
        assert!(err.to_string().contains("unknown examination location"));
    }

    #[test]
    fn diagnosis_resolves_alias() {
        let out = run(
            &registry(),
            Commands::Diagnosis {
                code: "nv_m".into(),
            },
        )
        .expect("alias");
        assert_eq!(out, "NV\tМеланоцитарные невусы");
    }

    #[test]
    fn proxy_prints_default_config_without_overrides() {
        let config = proxy_config(|_| None).expect("defaults");
        let expected = serde_json::json!({
            "pathPrefix": "/api",
            "target": "http://127.0.0.1:8000",
            "changeOrigin": true,
            "rewritePath": false
        });
        assert_eq!(serde_json::to_value(&config).expect("json"), expected);

        let unset = ["DERM_PROXY_PREFIX", "DERM_PROXY_TARGET", "DERM_PROXY_CHANGE_ORIGIN"]
            .iter()
            .all(|key| std::env::var_os(key).is_none());
        if unset {
            let out = run(&registry(), Commands::Proxy).expect("proxy");
            let parsed: serde_json::Value = serde_json::from_str(&out).expect("valid json");
            assert_eq!(parsed, expected);
        }
    }

    #[test]
    fn proxy_reads_overrides_by_variable_name() {
        let config = proxy_config(|key| match key {
            "DERM_PROXY_PREFIX" => Some("/backend".into()),
            "DERM_PROXY_TARGET" => Some("http://localhost:9000".into()),
            "DERM_PROXY_CHANGE_ORIGIN" => Some("false".into()),
            _ => None,
        })
        .expect("overrides");
        let json = serde_json::to_value(&config).expect("json");
        assert_eq!(json["pathPrefix"], "/backend");
        assert_eq!(json["target"], "http://localhost:9000");
        assert_eq!(json["changeOrigin"], false);

        let err = proxy_config(|key| (key == "DERM_PROXY_PREFIX").then(|| "api".to_owned()))
            .expect_err("prefix without leading slash");
        assert!(err.to_string().contains("must start with '/'"));
    }

    #[test]
    fn validate_lists_aliases() {
        let summary = summarise(&registry());
        assert!(summary.contains("disease: 8 codes, 7 options"));
        assert!(summary.contains("alias NV_M -> NV"));
        assert!(summary.contains("location: 15 codes, 15 options"));
        assert!(!summary.contains("not offered"));
    }
}
