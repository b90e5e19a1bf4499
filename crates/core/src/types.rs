use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Unique identifier for a family account
    FamilyId
);
string_id!(
    /// Unique identifier for a child profile
    ChildId
);
string_id!(
    /// Unique identifier for an enrolled device
    DeviceId
);
string_id!(
    /// Unique identifier for a catalogued platform (app, site, service)
    PlatformId
);

/// A household grouping parents and children
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Family {
    pub id: FamilyId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A child profile within a family
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Child {
    pub id: ChildId,
    pub family_id: FamilyId,
    pub name: String,
    pub birth_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl Child {
    /// Age in whole years on the given date
    pub fn age_on(&self, date: NaiveDate) -> u32 {
        date.years_since(self.birth_date).unwrap_or(0)
    }
}

/// Operating system of an enrolled device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DevicePlatform {
    Ios,
    Android,
    Windows,
    Macos,
    Chromeos,
    Console,
    Other,
}

/// A device enrolled for a child
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    pub child_id: ChildId,
    pub name: String,
    pub platform: DevicePlatform,
    #[serde(default)]
    pub paused: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_seen_at: Option<DateTime<Utc>>,
}

/// Maximum content rating a child may access
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentRating {
    AllAges,
    SevenPlus,
    TwelvePlus,
    SixteenPlus,
    Adult,
}

/// Nightly window during which devices are locked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bedtime {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl Bedtime {
    /// Whether `time` falls inside the window. Windows may wrap past midnight.
    pub fn contains(&self, time: NaiveTime) -> bool {
        if self.start <= self.end {
            time >= self.start && time < self.end
        } else {
            time >= self.start || time < self.end
        }
    }
}

/// Screen-time and content rules applied to a child
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildPolicy {
    pub child_id: ChildId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_screen_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bedtime: Option<Bedtime>,
    pub max_rating: ContentRating,
    #[serde(default)]
    pub blocked_platforms: Vec<PlatformId>,
}

/// Category a platform is catalogued under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformCategory {
    Streaming,
    Social,
    Gaming,
    Messaging,
    Education,
    Browser,
    Other,
}

impl PlatformCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformCategory::Streaming => "streaming",
            PlatformCategory::Social => "social",
            PlatformCategory::Gaming => "gaming",
            PlatformCategory::Messaging => "messaging",
            PlatformCategory::Education => "education",
            PlatformCategory::Browser => "browser",
            PlatformCategory::Other => "other",
        }
    }
}

/// A third-party service that policies can allow or block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub id: PlatformId,
    pub name: String,
    pub category: PlatformCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}
