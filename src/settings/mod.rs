use config::{Config, ConfigError, File};
use serde::de::{self, Deserializer, Unexpected, Visitor};
use serde::Deserialize;
use std::fmt;
use std::net::Ipv4Addr;

use crate::protocol::types::DomainName;

#[derive(Debug, Clone, Eq, PartialEq, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub static_records: Vec<StaticRecord>,
}

/// An A record served authoritatively by the responder.
#[derive(Debug, Clone, Eq, PartialEq, Deserialize)]
pub struct StaticRecord {
    pub domain: Name,
    #[serde(rename = "a")]
    pub address: Ipv4Addr,
    #[serde(default = "default_ttl")]
    pub ttl: u32,
}

fn default_ttl() -> u32 {
    300
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Name {
    pub domain: DomainName,
}

impl<'de> Deserialize<'de> for Name {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct NameVisitor;

        impl<'de> Visitor<'de> for NameVisitor {
            type Value = Name;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("struct Name")
            }

            fn visit_str<E>(self, v: &str) -> Result<Name, E>
            where
                E: de::Error,
            {
                match DomainName::from_dotted_string(v) {
                    Some(domain) => Ok(Name { domain }),
                    None => Err(de::Error::invalid_value(
                        Unexpected::Str(v),
                        &"a valid domain name",
                    )),
                }
            }
        }

        deserializer.deserialize_str(NameVisitor)
    }
}

impl Settings {
    pub fn new(filename: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(filename))
            .build()?
            .try_deserialize()
    }
}
