//! `users.get` data model
//!
//! Field names follow the VK schema (https://vk.com/dev/fields). Every
//! field is optional on the wire; an absent field decodes to its empty
//! value.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::epoch::EpochTime;
use crate::error::{Error, Result};

/// Grammatical case used to decline returned first and last names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameCase {
    #[default]
    Nom,
    Gen,
    Dat,
    Acc,
    Ins,
    Abl,
}

impl NameCase {
    pub const ALL: [NameCase; 6] = [
        NameCase::Nom,
        NameCase::Gen,
        NameCase::Dat,
        NameCase::Acc,
        NameCase::Ins,
        NameCase::Abl,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NameCase::Nom => "nom",
            NameCase::Gen => "gen",
            NameCase::Dat => "dat",
            NameCase::Acc => "acc",
            NameCase::Ins => "ins",
            NameCase::Abl => "abl",
        }
    }
}

impl fmt::Display for NameCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NameCase {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|case| case.as_str() == s)
            .ok_or_else(|| {
                let accepted: Vec<&str> = Self::ALL.iter().map(NameCase::as_str).collect();
                Error::Validation(format!(
                    "unknown name case {s:?}; the only available name cases are: {}",
                    accepted.join(", ")
                ))
            })
    }
}

/// Envelope of a method call: either `response` or `error` is set.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub response: Option<T>,
    pub error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub error_code: i64,
    #[serde(default)]
    pub error_msg: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct UserProfile {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub screen_name: String,
    pub nickname: String,
    /// 1 female, 2 male, 0 unspecified
    pub sex: u8,
    pub domain: String,
    /// `D.M.YYYY` or `D.M` when the year is hidden
    pub bdate: String,
    pub city: Option<GeoPlace>,
    pub country: Option<GeoPlace>,
    pub photo_50: String,
    pub photo_100: String,
    pub photo_200: String,
    pub photo_max: String,
    pub photo_200_orig: String,
    pub photo_max_orig: String,
    #[serde(deserialize_with = "flag")]
    pub has_mobile: bool,
    #[serde(deserialize_with = "flag")]
    pub online: bool,
    #[serde(deserialize_with = "flag")]
    pub can_post: bool,
    #[serde(deserialize_with = "flag")]
    pub can_see_all_posts: bool,
    #[serde(deserialize_with = "flag")]
    pub can_see_audio: bool,
    #[serde(deserialize_with = "flag")]
    pub can_write_private_message: bool,
    pub site: String,
    pub status: String,
    pub last_seen: Option<LastSeen>,
    pub common_count: u32,
    pub university: i64,
    pub university_name: String,
    pub faculty: i64,
    pub faculty_name: String,
    pub graduation: i32,
    pub relation: u8,
    pub universities: Vec<University>,
    pub schools: Vec<School>,
    pub relatives: Vec<Relative>,
}

/// City or country reference
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct GeoPlace {
    pub id: i64,
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LastSeen {
    pub time: EpochTime,
    /// 1 mobile web, 2 iPhone, 3 iPad, 4 Android, 5 Windows Phone, 6 Windows 8, 7 full site
    pub platform: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct University {
    pub id: i64,
    pub country: i64,
    pub city: i64,
    pub name: String,
    pub faculty: i64,
    pub faculty_name: String,
    pub chair: i64,
    pub chair_name: String,
    pub graduation: i32,
    pub education_form: String,
    pub education_status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct School {
    pub id: i64,
    pub country: i64,
    pub city: i64,
    pub name: String,
    pub year_from: i32,
    pub year_to: i32,
    pub class: String,
    pub type_str: String,
    pub speciality: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Relative {
    /// Negative for relatives without a VK account
    pub id: i64,
    /// `parent`, `child`, `grandparent`, `grandchild` or `sibling`
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
}

/// VK sends boolean flags as `0`/`1`; accept real booleans too.
fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Int(n) => n != 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_case_parses_all_six_codes() {
        for code in ["nom", "gen", "dat", "acc", "ins", "abl"] {
            let case: NameCase = code.parse().unwrap();
            assert_eq!(case.as_str(), code);
            assert_eq!(case.to_string(), code);
        }
        assert_eq!(NameCase::default(), NameCase::Nom);
    }

    #[test]
    fn name_case_rejects_unknown_code() {
        for bad in ["xyz", "", "NOM", "nominative"] {
            match bad.parse::<NameCase>() {
                Err(Error::Validation(msg)) => {
                    assert!(msg.contains("nom, gen, dat, acc, ins, abl"), "got: {msg}")
                }
                other => panic!("{bad:?} must be rejected, got {other:?}"),
            }
        }
    }

    #[test]
    fn minimal_profile_defaults_everything_else() {
        let user: UserProfile =
            serde_json::from_str(r#"{"id":1,"first_name":"Pavel","last_name":"Durov"}"#).unwrap();
        assert_eq!(user.id, 1);
        assert_eq!(user.first_name, "Pavel");
        assert!(user.city.is_none());
        assert!(user.last_seen.is_none());
        assert!(!user.online);
        assert!(user.relatives.is_empty());
        assert_eq!(user.photo_max, "");
    }

    #[test]
    fn full_profile_decodes() {
        let json = r#"{
            "id": 1,
            "first_name": "Pavel",
            "last_name": "Durov",
            "screen_name": "durov",
            "sex": 2,
            "bdate": "10.10.1984",
            "city": {"id": 2, "title": "Saint Petersburg"},
            "country": {"id": 1, "title": "Russia"},
            "photo_200": "https://pp.vk.me/photo.jpg",
            "has_mobile": 1,
            "online": 0,
            "can_post": true,
            "last_seen": {"time": 1390000000, "platform": 7},
            "faculty_name": "Philology",
            "universities": [{"id": 1, "name": "SPbSU", "graduation": 2006}],
            "schools": [{"id": "ignored-type", "name": "Gymnasium"}],
            "relatives": [{"id": -5, "type": "sibling", "name": "Nikolai"}]
        }"#;
        let result = serde_json::from_str::<UserProfile>(json);
        assert!(result.is_err(), "string school id must not decode as integer");

        let json = json.replace("\"ignored-type\"", "239");
        let user: UserProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(user.screen_name, "durov");
        assert_eq!(user.city.as_ref().unwrap().title, "Saint Petersburg");
        assert!(user.has_mobile);
        assert!(!user.online);
        assert!(user.can_post);
        assert_eq!(user.last_seen.as_ref().unwrap().time.unix(), 1_390_000_000);
        assert_eq!(user.last_seen.as_ref().unwrap().platform, 7);
        assert_eq!(user.faculty_name, "Philology");
        assert_eq!(user.universities[0].graduation, 2006);
        assert_eq!(user.schools[0].id, 239);
        assert_eq!(user.relatives[0].kind, "sibling");
        assert_eq!(user.relatives[0].id, -5);
    }

    #[test]
    fn last_seen_rejects_fractional_time() {
        let json = r#"{"id":1,"last_seen":{"time":1390000000.5,"platform":7}}"#;
        assert!(serde_json::from_str::<UserProfile>(json).is_err());
    }

    #[test]
    fn envelope_decodes_either_shape() {
        let ok: Envelope<Vec<UserProfile>> =
            serde_json::from_str(r#"{"response":[{"id":1}]}"#).unwrap();
        assert_eq!(ok.response.unwrap()[0].id, 1);
        assert!(ok.error.is_none());

        let err: Envelope<Vec<UserProfile>> = serde_json::from_str(
            r#"{"error":{"error_code":5,"error_msg":"User authorization failed","request_params":[]}}"#,
        )
        .unwrap();
        assert!(err.response.is_none());
        assert_eq!(err.error.unwrap().error_code, 5);
    }
}
