use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// Web Push credentials; `None` disables the push subsystem entirely
    pub vapid: Option<VapidConfig>,
}

#[derive(Debug, Clone)]
pub struct VapidConfig {
    pub public_key: String,
    pub private_key: String,
    /// `mailto:` or https contact handed to the push services
    pub subject: String,
}

const DEFAULT_VAPID_SUBJECT: &str = "mailto:suporte@appvital.com.br";

impl Config {
    pub fn new() -> Self {
        let default_port = "3001";
        let port = std::env::var("PORT").unwrap_or_else(|_| default_port.into());
        let port = match port.parse::<usize>() {
            Ok(port) => port,
            Err(_) => {
                warn!(
                    "The given PORT: {} is not valid, falling back to the default port: {}.",
                    port, default_port
                );
                default_port.parse::<usize>().unwrap()
            }
        };

        let vapid = match (
            std::env::var("VAPID_PUBLIC_KEY"),
            std::env::var("VAPID_PRIVATE_KEY"),
        ) {
            (Ok(public_key), Ok(private_key)) => Some(VapidConfig {
                public_key: clean_vapid_key(&public_key),
                private_key: clean_vapid_key(&private_key),
                subject: std::env::var("VAPID_SUBJECT")
                    .unwrap_or_else(|_| DEFAULT_VAPID_SUBJECT.into()),
            }),
            _ => {
                info!("Did not find VAPID key environment variables.");
                None
            }
        };

        Self { port, vapid }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

/// Keys pasted into env files tend to pick up stray whitespace and base64
/// padding that the push services reject.
fn clean_vapid_key(key: &str) -> String {
    key.chars()
        .filter(|c| !c.is_whitespace() && *c != '=')
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn it_strips_whitespace_and_padding_from_vapid_keys() {
        assert_eq!(clean_vapid_key("  aBc\r\nDef==\n"), "aBcDef");
        assert_eq!(clean_vapid_key("plain"), "plain");
    }
}
