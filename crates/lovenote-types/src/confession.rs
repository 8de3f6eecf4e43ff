use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Unique identifier for a confession, wrapping a UUID v7 (time-sortable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConfessionId(pub Uuid);

impl ConfessionId {
    /// Create a new ConfessionId using UUID v7.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for ConfessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConfessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ConfessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Moderation state of a confession.
///
/// Submissions from the wizard are auto-approved; an admin can move a
/// confession between any of the three states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfessionStatus {
    Pending,
    Approved,
    Rejected,
}

impl fmt::Display for ConfessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfessionStatus::Pending => write!(f, "pending"),
            ConfessionStatus::Approved => write!(f, "approved"),
            ConfessionStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl FromStr for ConfessionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(ConfessionStatus::Pending),
            "approved" => Ok(ConfessionStatus::Approved),
            "rejected" => Ok(ConfessionStatus::Rejected),
            other => Err(format!("invalid confession status: '{other}'")),
        }
    }
}

impl Default for ConfessionStatus {
    fn default() -> Self {
        ConfessionStatus::Pending
    }
}

/// Emotional tone picked on the message step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Sweet,
    Nervous,
    Bold,
    Shy,
}

impl Mood {
    pub const ALL: [Mood; 4] = [Mood::Sweet, Mood::Nervous, Mood::Bold, Mood::Shy];

    /// Human-readable label shown in pickers.
    pub fn label(&self) -> &'static str {
        match self {
            Mood::Sweet => "Sweet & Romantic",
            Mood::Nervous => "Nervous but Hopeful",
            Mood::Bold => "Bold & Confident",
            Mood::Shy => "Shy & Reserved",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Mood::Sweet => "🥰",
            Mood::Nervous => "😳",
            Mood::Bold => "😏",
            Mood::Shy => "🙈",
        }
    }
}

/// Emoji for an optional mood; confessions without one get a plain heart.
pub fn mood_emoji(mood: Option<Mood>) -> &'static str {
    mood.map(|m| m.emoji()).unwrap_or("💝")
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mood::Sweet => write!(f, "sweet"),
            Mood::Nervous => write!(f, "nervous"),
            Mood::Bold => write!(f, "bold"),
            Mood::Shy => write!(f, "shy"),
        }
    }
}

impl FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sweet" => Ok(Mood::Sweet),
            "nervous" => Ok(Mood::Nervous),
            "bold" => Ok(Mood::Bold),
            "shy" => Ok(Mood::Shy),
            other => Err(format!("invalid mood: '{other}'")),
        }
    }
}

/// Year of study or batch tag. Serialized with its display label
/// ("3rd Year"), which is also what the store keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum YearOrBatch {
    #[serde(rename = "1st Year")]
    First,
    #[serde(rename = "2nd Year")]
    Second,
    #[serde(rename = "3rd Year")]
    Third,
    #[serde(rename = "4th Year")]
    Fourth,
    #[serde(rename = "Final Year")]
    Final,
    #[serde(rename = "Alumni")]
    Alumni,
}

impl YearOrBatch {
    pub const ALL: [YearOrBatch; 6] = [
        YearOrBatch::First,
        YearOrBatch::Second,
        YearOrBatch::Third,
        YearOrBatch::Fourth,
        YearOrBatch::Final,
        YearOrBatch::Alumni,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            YearOrBatch::First => "1st Year",
            YearOrBatch::Second => "2nd Year",
            YearOrBatch::Third => "3rd Year",
            YearOrBatch::Fourth => "4th Year",
            YearOrBatch::Final => "Final Year",
            YearOrBatch::Alumni => "Alumni",
        }
    }
}

impl fmt::Display for YearOrBatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for YearOrBatch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        YearOrBatch::ALL
            .into_iter()
            .find(|y| y.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("invalid year or batch: '{wanted}'"))
    }
}

/// The record shape sent to the store on create.
///
/// Field names match the store schema. When `is_anonymous` is true every
/// sender field and `additional_message` is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewConfession {
    pub message: String,
    pub mood: Option<Mood>,
    pub song_link: Option<String>,
    pub college_name: String,
    pub department: Option<String>,
    pub year_or_batch: YearOrBatch,
    pub section: Option<String>,
    pub recipient_hint: Option<String>,
    pub is_anonymous: bool,
    pub sender_name: Option<String>,
    pub sender_email: Option<String>,
    pub sender_phone: Option<String>,
    pub sender_section: Option<String>,
    pub additional_message: Option<String>,
    pub unique_code: String,
    pub status: ConfessionStatus,
}

/// A submitted confession as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Confession {
    pub id: ConfessionId,
    pub message: String,
    pub mood: Option<Mood>,
    pub song_link: Option<String>,
    pub college_name: String,
    pub department: Option<String>,
    pub year_or_batch: YearOrBatch,
    pub section: Option<String>,
    pub recipient_hint: Option<String>,
    pub is_anonymous: bool,
    pub sender_name: Option<String>,
    pub sender_email: Option<String>,
    pub sender_phone: Option<String>,
    pub sender_section: Option<String>,
    pub additional_message: Option<String>,
    /// 8-character retrieval code.
    pub unique_code: String,
    pub status: ConfessionStatus,
    pub views: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Confession {
    /// Materialize a stored record from the create shape plus store-assigned fields.
    pub fn from_new(new: NewConfession, id: ConfessionId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            message: new.message,
            mood: new.mood,
            song_link: new.song_link,
            college_name: new.college_name,
            department: new.department,
            year_or_batch: new.year_or_batch,
            section: new.section,
            recipient_hint: new.recipient_hint,
            is_anonymous: new.is_anonymous,
            sender_name: new.sender_name,
            sender_email: new.sender_email,
            sender_phone: new.sender_phone,
            sender_section: new.sender_section,
            additional_message: new.additional_message,
            unique_code: new.unique_code,
            status: new.status,
            views: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Name to show as the sender, honoring anonymity.
    pub fn display_sender(&self) -> &str {
        match (&self.sender_name, self.is_anonymous) {
            (Some(name), false) => name,
            _ => "Anonymous",
        }
    }
}

/// What public pages may show of a confession. Contact details never leave
/// the admin surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicConfession {
    pub id: ConfessionId,
    pub message: String,
    pub mood: Option<Mood>,
    pub song_link: Option<String>,
    pub college_name: String,
    pub department: Option<String>,
    pub year_or_batch: YearOrBatch,
    pub section: Option<String>,
    pub recipient_hint: Option<String>,
    pub is_anonymous: bool,
    pub sender_name: Option<String>,
    pub additional_message: Option<String>,
    pub unique_code: String,
    pub views: i64,
    pub created_at: DateTime<Utc>,
}

impl From<&Confession> for PublicConfession {
    fn from(c: &Confession) -> Self {
        let attributed = !c.is_anonymous;
        Self {
            id: c.id,
            message: c.message.clone(),
            mood: c.mood,
            song_link: c.song_link.clone(),
            college_name: c.college_name.clone(),
            department: c.department.clone(),
            year_or_batch: c.year_or_batch,
            section: c.section.clone(),
            recipient_hint: c.recipient_hint.clone(),
            is_anonymous: c.is_anonymous,
            sender_name: c.sender_name.clone().filter(|_| attributed),
            additional_message: c.additional_message.clone().filter(|_| attributed),
            unique_code: c.unique_code.clone(),
            views: c.views,
            created_at: c.created_at,
        }
    }
}

/// Emoji reaction kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionType {
    Hearts,
    Smiles,
    Tears,
}

impl ReactionType {
    pub const ALL: [ReactionType; 3] = [ReactionType::Hearts, ReactionType::Smiles, ReactionType::Tears];

    pub fn emoji(&self) -> &'static str {
        match self {
            ReactionType::Hearts => "❤️",
            ReactionType::Smiles => "😊",
            ReactionType::Tears => "😭",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReactionType::Hearts => "Love",
            ReactionType::Smiles => "Sweet",
            ReactionType::Tears => "Touched",
        }
    }
}

impl fmt::Display for ReactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReactionType::Hearts => write!(f, "hearts"),
            ReactionType::Smiles => write!(f, "smiles"),
            ReactionType::Tears => write!(f, "tears"),
        }
    }
}

impl FromStr for ReactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hearts" | "heart" | "love" => Ok(ReactionType::Hearts),
            "smiles" | "smile" | "sweet" => Ok(ReactionType::Smiles),
            "tears" | "tear" | "touched" => Ok(ReactionType::Tears),
            other => Err(format!("invalid reaction type: '{other}'")),
        }
    }
}

/// A single stored reaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    pub id: Uuid,
    pub confession_id: ConfessionId,
    pub reaction_type: ReactionType,
    pub session_identifier: String,
    pub created_at: DateTime<Utc>,
}

/// Per-type reaction tallies for one confession.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionCounts {
    pub hearts: i64,
    pub smiles: i64,
    pub tears: i64,
}

impl ReactionCounts {
    pub fn increment(&mut self, kind: ReactionType) {
        match kind {
            ReactionType::Hearts => self.hearts += 1,
            ReactionType::Smiles => self.smiles += 1,
            ReactionType::Tears => self.tears += 1,
        }
    }

    pub fn get(&self, kind: ReactionType) -> i64 {
        match kind {
            ReactionType::Hearts => self.hearts,
            ReactionType::Smiles => self.smiles,
            ReactionType::Tears => self.tears,
        }
    }

    pub fn total(&self) -> i64 {
        self.hearts + self.smiles + self.tears
    }
}

/// Aggregate numbers for the admin dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfessionStatistics {
    pub total_confessions: i64,
    pub approved_confessions: i64,
    pub pending_confessions: i64,
    pub rejected_confessions: i64,
    pub total_views: i64,
    pub total_reactions: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confession_id_display() {
        let id = ConfessionId::new();
        let parsed: ConfessionId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!("APPROVED".parse::<ConfessionStatus>().unwrap(), ConfessionStatus::Approved);
        assert!("archived".parse::<ConfessionStatus>().is_err());
    }

    #[test]
    fn test_year_or_batch_serializes_as_label() {
        let json = serde_json::to_string(&YearOrBatch::Third).unwrap();
        assert_eq!(json, "\"3rd Year\"");
        let parsed: YearOrBatch = serde_json::from_str("\"Final Year\"").unwrap();
        assert_eq!(parsed, YearOrBatch::Final);
    }

    #[test]
    fn test_year_or_batch_from_str() {
        assert_eq!("alumni".parse::<YearOrBatch>().unwrap(), YearOrBatch::Alumni);
        assert_eq!(" 2nd year ".parse::<YearOrBatch>().unwrap(), YearOrBatch::Second);
        assert!("5th Year".parse::<YearOrBatch>().is_err());
    }

    #[test]
    fn test_mood_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Mood::Nervous).unwrap(), "\"nervous\"");
        assert!(serde_json::from_str::<Mood>("\"angry\"").is_err());
    }

    #[test]
    fn test_mood_emoji_fallback() {
        assert_eq!(mood_emoji(Some(Mood::Shy)), "🙈");
        assert_eq!(mood_emoji(None), "💝");
    }

    #[test]
    fn test_reaction_aliases() {
        assert_eq!("love".parse::<ReactionType>().unwrap(), ReactionType::Hearts);
        assert_eq!("smiles".parse::<ReactionType>().unwrap(), ReactionType::Smiles);
        assert!("laugh".parse::<ReactionType>().is_err());
    }

    #[test]
    fn test_reaction_counts() {
        let mut counts = ReactionCounts::default();
        counts.increment(ReactionType::Hearts);
        counts.increment(ReactionType::Hearts);
        counts.increment(ReactionType::Tears);
        assert_eq!(counts.get(ReactionType::Hearts), 2);
        assert_eq!(counts.get(ReactionType::Smiles), 0);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn test_display_sender_respects_anonymity() {
        let new = NewConfession {
            message: "Ten characters!".to_string(),
            mood: None,
            song_link: None,
            college_name: "MIT".to_string(),
            department: Some("CS".to_string()),
            year_or_batch: YearOrBatch::Third,
            section: None,
            recipient_hint: None,
            is_anonymous: true,
            sender_name: Some("Sam".to_string()),
            sender_email: None,
            sender_phone: None,
            sender_section: None,
            additional_message: None,
            unique_code: "ABCDEFGH".to_string(),
            status: ConfessionStatus::Approved,
        };
        let mut confession = Confession::from_new(new, ConfessionId::new(), Utc::now());
        assert_eq!(confession.display_sender(), "Anonymous");
        confession.is_anonymous = false;
        assert_eq!(confession.display_sender(), "Sam");
        assert_eq!(confession.views, 0);
    }

    #[test]
    fn test_public_view_drops_contact_details() {
        let new = NewConfession {
            message: "See you at the fest".to_string(),
            mood: Some(Mood::Sweet),
            song_link: None,
            college_name: "MIT".to_string(),
            department: None,
            year_or_batch: YearOrBatch::First,
            section: None,
            recipient_hint: None,
            is_anonymous: false,
            sender_name: Some("Ana".to_string()),
            sender_email: Some("ana@example.com".to_string()),
            sender_phone: Some("9876543210".to_string()),
            sender_section: Some("B".to_string()),
            additional_message: Some("wave at me".to_string()),
            unique_code: "HJKLMNPQ".to_string(),
            status: ConfessionStatus::Approved,
        };
        let confession = Confession::from_new(new, ConfessionId::new(), Utc::now());
        let public = PublicConfession::from(&confession);
        let json = serde_json::to_value(&public).unwrap();
        assert_eq!(public.sender_name.as_deref(), Some("Ana"));
        assert_eq!(public.additional_message.as_deref(), Some("wave at me"));
        assert!(json.get("sender_email").is_none());
        assert!(json.get("sender_phone").is_none());
    }
}
