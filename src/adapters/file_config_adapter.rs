//! INI file configuration adapter.

use crate::domain::error::StratlabError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

#[derive(Debug)]
pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, StratlabError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config
            .load(path)
            .map_err(|reason| StratlabError::ConfigParse {
                file: path.display().to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, StratlabError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| StratlabError::ConfigParse {
                file: "<string>".to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.trim().to_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.config
            .get(section, key)
            .as_deref()
            .and_then(Self::parse_bool)
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_parses_sections() {
        let content = r#"
[backtest]
symbol = AAPL
initial_capital = 10000.0

[strategy]
kind = moving_average
short_window = 5

[data]
synthetic = yes
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(
            adapter.get_string("backtest", "symbol"),
            Some("AAPL".to_string())
        );
        assert_eq!(adapter.get_double("backtest", "initial_capital", 0.0), 10_000.0);
        assert_eq!(adapter.get_int("strategy", "short_window", 0), 5);
        assert!(adapter.get_bool("data", "synthetic", false));
    }

    #[test]
    fn missing_keys_use_defaults() {
        let adapter = FileConfigAdapter::from_string("[backtest]\n").unwrap();
        assert_eq!(adapter.get_string("backtest", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
        assert_eq!(adapter.get_int("backtest", "missing", 42), 42);
        assert_eq!(adapter.get_double("backtest", "missing", 99.9), 99.9);
        assert!(adapter.get_bool("backtest", "missing", true));
    }

    #[test]
    fn unparsable_numbers_use_defaults() {
        let adapter =
            FileConfigAdapter::from_string("[strategy]\nlong_window = abc\noversold = x\n").unwrap();
        assert_eq!(adapter.get_int("strategy", "long_window", 30), 30);
        assert_eq!(adapter.get_double("strategy", "oversold", 30.0), 30.0);
    }

    #[test]
    fn bool_spellings() {
        let adapter = FileConfigAdapter::from_string(
            "[data]\na = true\nb = On\nc = 1\nd = false\ne = no\nf = maybe\n",
        )
        .unwrap();
        assert!(adapter.get_bool("data", "a", false));
        assert!(adapter.get_bool("data", "b", false));
        assert!(adapter.get_bool("data", "c", false));
        assert!(!adapter.get_bool("data", "d", true));
        assert!(!adapter.get_bool("data", "e", true));
        assert!(adapter.get_bool("data", "f", true));
    }

    #[test]
    fn require_string_reports_missing_key() {
        let adapter = FileConfigAdapter::from_string("[backtest]\nsymbol =   \n").unwrap();
        let err = adapter.require_string("backtest", "symbol").unwrap_err();
        assert!(
            matches!(err, StratlabError::ConfigMissing { section, key } if section == "backtest" && key == "symbol")
        );
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config("[data]\ncsv_dir = /srv/prices\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("data", "csv_dir"),
            Some("/srv/prices".to_string())
        );
    }

    #[test]
    fn from_file_missing_is_parse_error() {
        let err = FileConfigAdapter::from_file("/nonexistent/path/config.ini").unwrap_err();
        assert!(matches!(err, StratlabError::ConfigParse { .. }));
        assert!(err.is_configuration());
    }
}
