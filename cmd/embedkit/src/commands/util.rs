//! Request-file and output helpers shared by the subcommands.

use std::path::Path;

use anyhow::Context;

use crate::Cli;

/// Encoding of a request or embedding file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Json,
    Yaml,
}

impl FileFormat {
    /// `.json` files are JSON; anything else is read as YAML.
    fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

/// Loads a request from a YAML or JSON file, chosen by extension.
pub fn load_request<T: serde::de::DeserializeOwned>(path: &str) -> anyhow::Result<T> {
    let content = std::fs::read_to_string(path).with_context(|| format!("read {path}"))?;
    match FileFormat::from_path(Path::new(path)) {
        FileFormat::Json => serde_json::from_str(&content).with_context(|| format!("parse {path} as JSON")),
        FileFormat::Yaml => serde_yaml::from_str(&content).with_context(|| format!("parse {path} as YAML")),
    }
}

/// Returns the `-f` request file, which every file-driven subcommand needs.
pub fn require_input_file(cli: &Cli) -> anyhow::Result<&str> {
    cli.input.as_deref().context("input file is required, use -f flag")
}

/// Outputs result as JSON or YAML.
pub fn output_result<T: serde::Serialize>(cli: &Cli, result: &T) -> anyhow::Result<()> {
    let output = if cli.json {
        serde_json::to_string_pretty(result)? + "\n"
    } else {
        serde_yaml::to_string(result)?
    };

    match cli.output.as_deref() {
        Some(path) => std::fs::write(path, output).with_context(|| format!("write {path}"))?,
        None => print!("{}", output),
    }

    Ok(())
}

/// Prints verbose output if enabled.
pub fn print_verbose(cli: &Cli, msg: &str) {
    if cli.verbose {
        eprintln!("[verbose] {}", msg);
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use embedkit_embedder::EmbeddingOptions;

    use super::*;

    fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    #[test]
    fn load_yaml_by_default() {
        let f = write_temp(".yaml", "l2_normalize: true\n");
        let o: EmbeddingOptions = load_request(f.path().to_str().unwrap()).unwrap();
        assert!(o.l2_normalize);
        assert!(!o.quantize);
    }

    #[test]
    fn load_json_by_extension() {
        let f = write_temp(".json", r#"{"quantize": true}"#);
        let o: EmbeddingOptions = load_request(f.path().to_str().unwrap()).unwrap();
        assert!(o.quantize);
    }

    #[test]
    fn load_missing_file_fails() {
        let err = load_request::<EmbeddingOptions>("/nonexistent/request.yaml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/request.yaml"), "got {err}");
    }

    #[test]
    fn parse_error_names_file_and_format() {
        let f = write_temp(".JSON", "l2_normalize: true\n");
        let path = f.path().to_str().unwrap();
        let err = load_request::<EmbeddingOptions>(path).unwrap_err();
        assert_eq!(err.to_string(), format!("parse {path} as JSON"));
    }

    #[test]
    fn file_format_from_extension() {
        assert_eq!(FileFormat::from_path(Path::new("a.json")), FileFormat::Json);
        assert_eq!(FileFormat::from_path(Path::new("a.Json")), FileFormat::Json);
        assert_eq!(FileFormat::from_path(Path::new("a.yml")), FileFormat::Yaml);
        assert_eq!(FileFormat::from_path(Path::new("request")), FileFormat::Yaml);
    }
}
