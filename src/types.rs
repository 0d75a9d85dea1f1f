use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Whether an operation returns the decoded mapping verbatim or a typed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    Raw,
    #[default]
    Typed,
}

/// Result of a read operation in the requested [`Mode`].
#[derive(Debug, Clone, PartialEq)]
pub enum Payload<T> {
    Raw(Map<String, Value>),
    Typed(T),
}

impl<T> Payload<T> {
    pub fn raw(&self) -> Option<&Map<String, Value>> {
        match self {
            Payload::Raw(map) => Some(map),
            Payload::Typed(_) => None,
        }
    }

    pub fn typed(&self) -> Option<&T> {
        match self {
            Payload::Typed(v) => Some(v),
            Payload::Raw(_) => None,
        }
    }

    pub fn into_typed(self) -> Option<T> {
        match self {
            Payload::Typed(v) => Some(v),
            Payload::Raw(_) => None,
        }
    }

    pub fn into_raw(self) -> Option<Map<String, Value>> {
        match self {
            Payload::Raw(map) => Some(map),
            Payload::Typed(_) => None,
        }
    }
}

impl<T: Serialize> Payload<T> {
    /// JSON view of either variant; typed values serialize back to their original keys.
    pub fn to_value(&self) -> Result<Value> {
        match self {
            Payload::Raw(map) => Ok(Value::Object(map.clone())),
            Payload::Typed(v) => Ok(serde_json::to_value(v)?),
        }
    }
}

/// Identifier of a Hacker News item. Always non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ItemId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if let Ok(n) = trimmed.parse::<u64>() {
            return Ok(ItemId(n));
        }
        match trimmed.parse::<i64>() {
            Ok(n) => Err(negative_id(n)),
            Err(_) => Err(Error::InvalidArgument(format!("item id {:?} is not an integer", s))),
        }
    }
}

fn negative_id(n: i64) -> Error {
    Error::InvalidArgument(format!("item id {} is negative", n))
}

/// Conversion accepted by `get_item`: unsigned and signed integers, and strings holding one.
pub trait IntoItemId {
    fn into_item_id(self) -> Result<ItemId>;
}

impl IntoItemId for ItemId {
    fn into_item_id(self) -> Result<ItemId> {
        Ok(self)
    }
}

macro_rules! unsigned_item_id {
    ($($t:ty),*) => {$(
        impl IntoItemId for $t {
            fn into_item_id(self) -> Result<ItemId> {
                Ok(ItemId(u64::from(self)))
            }
        }
    )*};
}

macro_rules! signed_item_id {
    ($($t:ty),*) => {$(
        impl IntoItemId for $t {
            fn into_item_id(self) -> Result<ItemId> {
                u64::try_from(self)
                    .map(ItemId)
                    .map_err(|_| negative_id(i64::from(self)))
            }
        }
    )*};
}

unsigned_item_id!(u8, u16, u32, u64);
signed_item_id!(i8, i16, i32, i64);

impl IntoItemId for usize {
    fn into_item_id(self) -> Result<ItemId> {
        u64::try_from(self)
            .map(ItemId)
            .map_err(|_| Error::InvalidArgument(format!("item id {} is out of range", self)))
    }
}

impl IntoItemId for isize {
    fn into_item_id(self) -> Result<ItemId> {
        match u64::try_from(self) {
            Ok(n) => Ok(ItemId(n)),
            Err(_) if self < 0 => Err(negative_id(self as i64)),
            Err(_) => Err(Error::InvalidArgument(format!("item id {} is out of range", self))),
        }
    }
}

impl IntoItemId for &str {
    fn into_item_id(self) -> Result<ItemId> {
        self.parse()
    }
}

impl IntoItemId for String {
    fn into_item_id(self) -> Result<ItemId> {
        self.parse()
    }
}

impl IntoItemId for &String {
    fn into_item_id(self) -> Result<ItemId> {
        self.parse()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Job,
    Story,
    Comment,
    Poll,
    PollOpt,
    Other,
}

impl ItemKind {
    fn from_type(s: &str) -> Self {
        match s {
            "job" => ItemKind::Job,
            "story" => ItemKind::Story,
            "comment" => ItemKind::Comment,
            "poll" => ItemKind::Poll,
            "pollopt" => ItemKind::PollOpt,
            _ => ItemKind::Other,
        }
    }
}

/// A story, comment, job, poll or poll option.
///
/// Every documented key is optional; keys the server adds later land in `extra`.
/// Documented keys are typed: a value of the wrong JSON type (say a fractional `score`)
/// fails typed decoding with [`Error::Decode`] even though raw mode accepts it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted: Option<bool>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub by: Option<String>,
    /// Creation time, Unix seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<i64>,
    /// HTML.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dead: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poll: Option<u64>,
    /// Comment ids in ranked display order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kids: Option<Vec<u64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Poll options in display order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parts: Option<Vec<u64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descendants: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Item {
    pub fn kind(&self) -> Option<ItemKind> {
        self.kind.as_deref().map(ItemKind::from_type)
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.time.and_then(|t| DateTime::<Utc>::from_timestamp(t, 0))
    }

    /// Neither deleted nor dead.
    pub fn is_live(&self) -> bool {
        !self.deleted.unwrap_or(false) && !self.dead.unwrap_or(false)
    }
}

/// A user profile. Same leniency as [`Item`]: documented keys are optional but typed,
/// unknown keys land in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Case-sensitive user name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Minutes between a comment's creation and its visibility to others.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub karma: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted: Option<Vec<u64>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created.and_then(|t| DateTime::<Utc>::from_timestamp(t, 0))
    }
}

/// Recently changed items and profiles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Updates {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<u64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profiles: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn item_id_conversions() {
        assert_eq!(8863u64.into_item_id().unwrap(), ItemId(8863));
        assert_eq!(8863i32.into_item_id().unwrap(), ItemId(8863));
        assert_eq!(" 8863 ".into_item_id().unwrap(), ItemId(8863));
        assert_eq!(String::from("0").into_item_id().unwrap(), ItemId(0));
        assert_eq!(3usize.into_item_id().unwrap(), ItemId(3));
        assert_eq!(8863isize.into_item_id().unwrap(), ItemId(8863));
        assert!(matches!(
            (-2isize).into_item_id(),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn malformed_and_negative_ids_are_invalid() {
        for bad in ["notanumber", "", "12.5", "0x10"] {
            let err = bad.into_item_id().unwrap_err();
            assert!(matches!(err, Error::InvalidArgument(_)), "{bad}: {err}");
        }
        assert!(matches!(
            (-1i64).into_item_id(),
            Err(Error::InvalidArgument(_))
        ));
        let err = "-1".into_item_id().unwrap_err();
        assert!(err.to_string().contains("negative"));
    }

    #[test]
    fn item_keeps_unknown_keys() {
        let item: Item = serde_json::from_value(json!({
            "id": 8863,
            "type": "story",
            "by": "dhouston",
            "time": 1175714200,
            "kids": [9224, 8917],
            "flagged": true
        }))
        .unwrap();
        assert_eq!(item.id, Some(8863));
        assert_eq!(item.kind(), Some(ItemKind::Story));
        assert_eq!(item.kids.as_deref(), Some(&[9224u64, 8917][..]));
        assert_eq!(item.extra.get("flagged"), Some(&json!(true)));
        assert!(item.title.is_none());
        assert_eq!(
            item.created_at().unwrap().to_rfc3339(),
            "2007-04-04T19:16:40+00:00"
        );
        assert!(item.is_live());
    }

    #[test]
    fn typed_item_serializes_back_to_source_keys() {
        let source = json!({"id": 1, "type": "pollopt", "poll": 160704, "score": 3, "dead": true});
        let item: Item = serde_json::from_value(source.clone()).unwrap();
        assert_eq!(item.kind(), Some(ItemKind::PollOpt));
        assert!(!item.is_live());
        assert_eq!(serde_json::to_value(&item).unwrap(), source);
    }

    #[test]
    fn documented_keys_are_typed() {
        let body = json!({"id": 5, "score": 1.5});
        assert!(body.is_object());
        let err = serde_json::from_value::<Item>(body).unwrap_err();
        assert!(err.to_string().contains("1.5"));
        let err = serde_json::from_value::<User>(json!({"karma": "lots"})).unwrap_err();
        assert!(err.to_string().contains("lots"));
    }

    #[test]
    fn user_and_updates_decode() {
        let user: User = serde_json::from_value(json!({
            "id": "jl", "created": 1173923446, "delay": 0, "karma": 2937
        }))
        .unwrap();
        assert_eq!(user.id.as_deref(), Some("jl"));
        assert_eq!(user.delay, Some(0));
        assert!(user.submitted.is_none());
        assert!(user.created_at().is_some());

        let updates: Updates =
            serde_json::from_value(json!({"items": [1, 2], "profiles": ["pg"]})).unwrap();
        assert_eq!(updates.items, Some(vec![1, 2]));
        assert_eq!(updates.profiles, Some(vec!["pg".to_string()]));
        assert!(updates.extra.is_empty());
    }

    #[test]
    fn payload_accessors() {
        let typed: Payload<Updates> = Payload::Typed(Updates::default());
        assert!(typed.typed().is_some());
        assert!(typed.raw().is_none());
        assert_eq!(typed.to_value().unwrap(), json!({}));

        let mut map = Map::new();
        map.insert("items".into(), json!([3]));
        let raw: Payload<Updates> = Payload::Raw(map.clone());
        assert_eq!(raw.clone().into_raw(), Some(map));
        assert!(raw.into_typed().is_none());
    }
}
