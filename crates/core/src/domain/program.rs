use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProgramId(pub String);

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UniversityId(pub String);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct University {
    pub id: UniversityId,
    pub name: String,
}

/// Academic level a program is taught at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgramLevel {
    Diploma,
    Undergraduate,
    Postgraduate,
    Doctoral,
}

impl ProgramLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Diploma => "diploma",
            Self::Undergraduate => "undergraduate",
            Self::Postgraduate => "postgraduate",
            Self::Doctoral => "doctoral",
        }
    }
}

impl std::fmt::Display for ProgramLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a program is delivered to students.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMode {
    OnCampus,
    Online,
    Hybrid,
}

impl DeliveryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OnCampus => "on_campus",
            Self::Online => "online",
            Self::Hybrid => "hybrid",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "on_campus" | "on-campus" => Some(Self::OnCampus),
            "online" => Some(Self::Online),
            "hybrid" => Some(Self::Hybrid),
            _ => None,
        }
    }
}

impl std::fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One catalog entry. The fee is an annual figure in the catalog's home
/// currency; `featured` drives the primary ranking key.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub id: ProgramId,
    pub name: String,
    pub level: ProgramLevel,
    pub category: String,
    pub mode: DeliveryMode,
    pub fee: Decimal,
    pub featured: bool,
    pub university: University,
}
