//! Emperor record data structures.

use serde::{Deserialize, Serialize};

use super::cell::{de_opt_text, de_rank, de_score, de_text};

/// The sixteen scored dimensions of an emperor, in table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreField {
    Virtue,
    Wisdom,
    Fitness,
    Beauty,
    Diligence,
    Ambition,
    Dignity,
    Magnanimity,
    DesireSelfControl,
    PersonnelManagement,
    NationalPower,
    MilitaryDiplomacy,
    PublicSupport,
    EconomyLivelihood,
    HistoricalImpact,
    OverallScore,
}

impl ScoreField {
    pub const ALL: [ScoreField; 16] = [
        ScoreField::Virtue,
        ScoreField::Wisdom,
        ScoreField::Fitness,
        ScoreField::Beauty,
        ScoreField::Diligence,
        ScoreField::Ambition,
        ScoreField::Dignity,
        ScoreField::Magnanimity,
        ScoreField::DesireSelfControl,
        ScoreField::PersonnelManagement,
        ScoreField::NationalPower,
        ScoreField::MilitaryDiplomacy,
        ScoreField::PublicSupport,
        ScoreField::EconomyLivelihood,
        ScoreField::HistoricalImpact,
        ScoreField::OverallScore,
    ];

    /// Column name used on the wire and in the dataset.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Virtue => "virtue",
            Self::Wisdom => "wisdom",
            Self::Fitness => "fitness",
            Self::Beauty => "beauty",
            Self::Diligence => "diligence",
            Self::Ambition => "ambition",
            Self::Dignity => "dignity",
            Self::Magnanimity => "magnanimity",
            Self::DesireSelfControl => "desire_self_control",
            Self::PersonnelManagement => "personnel_management",
            Self::NationalPower => "national_power",
            Self::MilitaryDiplomacy => "military_diplomacy",
            Self::PublicSupport => "public_support",
            Self::EconomyLivelihood => "economy_livelihood",
            Self::HistoricalImpact => "historical_impact",
            Self::OverallScore => "overall_score",
        }
    }

    /// Display label shown to players.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Virtue => "德",
            Self::Wisdom => "智",
            Self::Fitness => "体",
            Self::Beauty => "美",
            Self::Diligence => "劳",
            Self::Ambition => "雄心",
            Self::Dignity => "尊严",
            Self::Magnanimity => "气量",
            Self::DesireSelfControl => "欲望自控",
            Self::PersonnelManagement => "人事管理",
            Self::NationalPower => "国力",
            Self::MilitaryDiplomacy => "军事外交",
            Self::PublicSupport => "民心",
            Self::EconomyLivelihood => "经济民生",
            Self::HistoricalImpact => "历史影响",
            Self::OverallScore => "综合评分",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.key() == key)
    }
}

/// One ruler's scored profile.
///
/// `overall_rank` is the identity: unique when present, and the only field
/// consulted when deciding whether a guess wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmperorRecord {
    #[serde(default, deserialize_with = "de_rank")]
    pub overall_rank: Option<u32>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub era: Option<String>,
    /// Temple name, posthumous name, or other regnal title.
    #[serde(
        default,
        rename = "temple_posthumous_title",
        deserialize_with = "de_text"
    )]
    pub title: String,
    #[serde(default, deserialize_with = "de_text")]
    pub name: String,
    #[serde(default, deserialize_with = "de_text")]
    pub short_comment: String,
    #[serde(default, deserialize_with = "de_score")]
    pub virtue: Option<f64>,
    #[serde(default, deserialize_with = "de_score")]
    pub wisdom: Option<f64>,
    #[serde(default, deserialize_with = "de_score")]
    pub fitness: Option<f64>,
    #[serde(default, deserialize_with = "de_score")]
    pub beauty: Option<f64>,
    #[serde(default, deserialize_with = "de_score")]
    pub diligence: Option<f64>,
    #[serde(default, deserialize_with = "de_score")]
    pub ambition: Option<f64>,
    #[serde(default, deserialize_with = "de_score")]
    pub dignity: Option<f64>,
    #[serde(default, deserialize_with = "de_score")]
    pub magnanimity: Option<f64>,
    #[serde(default, deserialize_with = "de_score")]
    pub desire_self_control: Option<f64>,
    #[serde(default, deserialize_with = "de_score")]
    pub personnel_management: Option<f64>,
    #[serde(default, deserialize_with = "de_score")]
    pub national_power: Option<f64>,
    #[serde(default, deserialize_with = "de_score")]
    pub military_diplomacy: Option<f64>,
    #[serde(default, deserialize_with = "de_score")]
    pub public_support: Option<f64>,
    #[serde(default, deserialize_with = "de_score")]
    pub economy_livelihood: Option<f64>,
    #[serde(default, deserialize_with = "de_score")]
    pub historical_impact: Option<f64>,
    #[serde(default, deserialize_with = "de_score")]
    pub overall_score: Option<f64>,
}

impl EmperorRecord {
    pub fn score(&self, field: ScoreField) -> Option<f64> {
        match field {
            ScoreField::Virtue => self.virtue,
            ScoreField::Wisdom => self.wisdom,
            ScoreField::Fitness => self.fitness,
            ScoreField::Beauty => self.beauty,
            ScoreField::Diligence => self.diligence,
            ScoreField::Ambition => self.ambition,
            ScoreField::Dignity => self.dignity,
            ScoreField::Magnanimity => self.magnanimity,
            ScoreField::DesireSelfControl => self.desire_self_control,
            ScoreField::PersonnelManagement => self.personnel_management,
            ScoreField::NationalPower => self.national_power,
            ScoreField::MilitaryDiplomacy => self.military_diplomacy,
            ScoreField::PublicSupport => self.public_support,
            ScoreField::EconomyLivelihood => self.economy_livelihood,
            ScoreField::HistoricalImpact => self.historical_impact,
            ScoreField::OverallScore => self.overall_score,
        }
    }

    pub fn set_score(&mut self, field: ScoreField, value: Option<f64>) {
        let slot = match field {
            ScoreField::Virtue => &mut self.virtue,
            ScoreField::Wisdom => &mut self.wisdom,
            ScoreField::Fitness => &mut self.fitness,
            ScoreField::Beauty => &mut self.beauty,
            ScoreField::Diligence => &mut self.diligence,
            ScoreField::Ambition => &mut self.ambition,
            ScoreField::Dignity => &mut self.dignity,
            ScoreField::Magnanimity => &mut self.magnanimity,
            ScoreField::DesireSelfControl => &mut self.desire_self_control,
            ScoreField::PersonnelManagement => &mut self.personnel_management,
            ScoreField::NationalPower => &mut self.national_power,
            ScoreField::MilitaryDiplomacy => &mut self.military_diplomacy,
            ScoreField::PublicSupport => &mut self.public_support,
            ScoreField::EconomyLivelihood => &mut self.economy_livelihood,
            ScoreField::HistoricalImpact => &mut self.historical_impact,
            ScoreField::OverallScore => &mut self.overall_score,
        };
        *slot = value;
    }

    pub fn era_str(&self) -> Option<&str> {
        self.era.as_deref()
    }

    pub fn brief(&self) -> EmperorBrief {
        EmperorBrief {
            overall_rank: self.overall_rank,
            era: self.era.clone(),
            title: self.title.clone(),
            name: self.name.clone(),
        }
    }
}

/// Rank, era, title and name only; feeds the DIY ordering page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmperorBrief {
    pub overall_rank: Option<u32>,
    pub era: Option<String>,
    #[serde(rename = "temple_posthumous_title")]
    pub title: String,
    pub name: String,
}
