use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub mqtt: MqttConfig,
    /// IoT thing whose shadow this panel drives.
    pub thing_name: String,
}

#[derive(Debug, Clone)]
pub struct MqttConfig {
    pub broker_host: String,
    pub broker_port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub client_id: String,
}

fn env_required(key: &str) -> Result<String, String> {
    env::var(key).map_err(|_| format!("{key} environment variable is required"))
}

fn env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

fn env_or_default<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Client IDs must be unique per broker session; suffix with the pid
        // so two panels on one machine do not evict each other.
        let default_client_id = format!("shadow-panel-{}", std::process::id());

        let config = Self {
            mqtt: MqttConfig {
                broker_host: env_required("MQTT_BROKER_HOST")?,
                broker_port: env_or_default("MQTT_BROKER_PORT", 1883),
                username: env_optional("MQTT_USERNAME"),
                password: env_optional("MQTT_PASSWORD"),
                client_id: env_or_default("MQTT_CLIENT_ID", default_client_id),
            },
            thing_name: env_or_default("THING_NAME", "ShanePi".to_string()),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), String> {
        if self.mqtt.broker_host.is_empty() {
            return Err("MQTT_BROKER_HOST must not be empty".into());
        }
        if self.thing_name.is_empty() {
            return Err("THING_NAME must not be empty".into());
        }
        if self.thing_name.contains(['/', '+', '#']) {
            return Err(format!(
                "THING_NAME '{}' contains MQTT topic separators or wildcards",
                self.thing_name
            ));
        }
        Ok(())
    }

    /// The one well-known topic: desired patches go out on it and reported
    /// state comes back in on it.
    pub fn shadow_update_topic(&self) -> String {
        format!("$aws/things/{}/shadow/update", self.thing_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(thing_name: &str) -> Config {
        Config {
            mqtt: MqttConfig {
                broker_host: "broker.local".to_string(),
                broker_port: 1883,
                username: None,
                password: None,
                client_id: "shadow-panel-test".to_string(),
            },
            thing_name: thing_name.to_string(),
        }
    }

    #[test]
    fn shadow_topic_embeds_thing_name() {
        assert_eq!(
            test_config("ShanePi").shadow_update_topic(),
            "$aws/things/ShanePi/shadow/update"
        );
    }

    #[test]
    fn validate_rejects_unsafe_thing_names() {
        assert!(test_config("a/b").validate().is_err());
        assert!(test_config("pi#").validate().is_err());
        assert!(test_config("").validate().is_err());
        assert!(test_config("ShanePi").validate().is_ok());
    }
}
