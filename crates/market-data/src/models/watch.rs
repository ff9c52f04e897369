use serde::{Deserialize, Serialize};

use super::instrument::InstrumentCode;

fn default_enabled() -> bool {
    true
}

/// An instrument the user asked to follow.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchItem {
    pub code: InstrumentCode,
    pub name: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub order: u32,
}

impl WatchItem {
    pub fn new(code: InstrumentCode, name: impl Into<String>) -> Self {
        Self {
            code,
            name: name.into(),
            enabled: true,
            order: 0,
        }
    }

    pub fn with_order(mut self, order: u32) -> Self {
        self.order = order;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_defaults() {
        let item: WatchItem =
            serde_json::from_str(r#"{"code":"005930","name":"삼성전자"}"#).unwrap();
        assert_eq!(item.code.as_str(), "005930");
        assert!(item.enabled);
        assert_eq!(item.order, 0);
    }

    #[test]
    fn test_deserialize_rejects_bad_code() {
        let result = serde_json::from_str::<WatchItem>(r#"{"code":"59","name":"x"}"#);
        assert!(result.is_err());
    }
}
