use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use chrono::{DateTime, NaiveDate, Utc};

/// Relación comercial con el cliente.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Segment {
    Guest,
    Customer,
    #[default]
    Potential,
}

impl Segment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Segment::Guest => "guest",
            Segment::Customer => "customer",
            Segment::Potential => "potential",
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Segment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "guest" => Ok(Segment::Guest),
            "customer" => Ok(Segment::Customer),
            "potential" => Ok(Segment::Potential),
            other => Err(anyhow!("Unknown customer segment: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub birth_date: NaiveDate,
    /// Etiqueta libre; las estadísticas solo reconocen "male" y "female".
    pub gender: String,
    pub last_campaign_at: Option<DateTime<Utc>>,
    pub segment: Segment,
}

/// Datos para insertar un cliente.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub birth_date: NaiveDate,
    pub gender: String,
    pub segment: Segment,
}
