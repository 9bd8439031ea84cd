//! The edit request coming in from the boundary layer
//!
//! The browsing UI submits a flat mapping of string parameters. The wire
//! field names (`key`, `type`, `field`, `value`, `pk`, `_editable`,
//! `item`, `push`, `member`, `score`, `members`, `ttl`, `index`) are kept
//! as-is for compatibility, but the presence-based branching happens in
//! exactly one place: a request parses into a tagged operation before it
//! ever reaches a handler.
//!
//! An "inline edit" is a single-cell edit in the browsing grid: the
//! `_editable` flag is set, `pk` identifies the existing row (field name,
//! list index or member) and `value` carries the new cell content.

use serde::{Deserialize, Serialize};

use crate::{Error, KeyType, Result};

/// A flat request mapping as posted by the browsing UI
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateRequest {
    /// Raw (display) key name
    pub key: String,
    /// Native type name as shown in the key listing
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    /// Existing row key for inline edits
    #[serde(default)]
    pub pk: Option<String>,
    /// Inline-edit marker; only its presence matters
    #[serde(rename = "_editable", default)]
    pub editable: Option<String>,
    #[serde(default)]
    pub item: Option<String>,
    /// Push direction for lists: "left" or "right"
    #[serde(default)]
    pub push: Option<String>,
    #[serde(default)]
    pub member: Option<String>,
    #[serde(default)]
    pub score: Option<String>,
    #[serde(default)]
    pub members: Option<Vec<String>>,
    #[serde(default)]
    pub ttl: Option<String>,
    #[serde(default)]
    pub index: Option<String>,
}

/// Which end of a list to push to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushSide {
    Left,
    Right,
}

/// A parsed update operation
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOp {
    /// Overwrite the whole string value
    StringSet { value: String },
    /// Set one hash field (covers both add-field and inline edit)
    HashSet { field: String, value: String },
    /// Push an item onto a list
    ListPush { side: PushSide, item: String },
    /// Overwrite the list element at an index (inline edit)
    ListSet { index: i64, value: String },
    /// Add a member to a set
    SetAdd { member: String },
    /// Replace one set member with another, atomically (inline edit)
    SetSwap { old: String, new: String },
    /// Upsert a sorted-set member (covers both add and inline score edit)
    ZsetAdd { member: String, score: f64 },
}

/// A parsed create operation
#[derive(Debug, Clone, PartialEq)]
pub enum StoreOp {
    String { value: String },
    Hash { field: String, value: String },
    List { item: String },
    Set { members: Vec<String> },
    Zset { member: String, score: f64 },
}

/// A parsed element-removal operation
#[derive(Debug, Clone, PartialEq)]
pub enum RemoveOp {
    HashField { field: String },
    ListIndex { index: i64 },
    SetMember { member: String },
    ZsetMember { member: String },
}

impl UpdateRequest {
    /// Create a request for the given key and type, for programmatic use
    pub fn new(key: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            type_name: type_name.into(),
            ..Self::default()
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Mark the request as an inline edit of the row identified by `pk`
    pub fn with_inline_edit(mut self, pk: impl Into<String>) -> Self {
        self.editable = Some("1".to_string());
        self.pk = Some(pk.into());
        self
    }

    pub fn with_item(mut self, item: impl Into<String>) -> Self {
        self.item = Some(item.into());
        self
    }

    pub fn with_push(mut self, side: impl Into<String>) -> Self {
        self.push = Some(side.into());
        self
    }

    pub fn with_member(mut self, member: impl Into<String>) -> Self {
        self.member = Some(member.into());
        self
    }

    pub fn with_score(mut self, score: impl Into<String>) -> Self {
        self.score = Some(score.into());
        self
    }

    pub fn with_members(mut self, members: Vec<String>) -> Self {
        self.members = Some(members);
        self
    }

    pub fn with_ttl(mut self, ttl: impl Into<String>) -> Self {
        self.ttl = Some(ttl.into());
        self
    }

    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }

    /// Canonical key type of the request
    pub fn kind(&self) -> Result<KeyType> {
        KeyType::from_native(&self.type_name)
    }

    /// Whether the request is an inline single-cell edit
    pub fn is_inline_edit(&self) -> bool {
        self.editable.is_some()
    }

    /// The ttl field, if supplied, parsed to seconds
    pub fn ttl_seconds(&self) -> Result<Option<i64>> {
        match &self.ttl {
            None => Ok(None),
            Some(raw) if raw.is_empty() => Ok(None),
            Some(raw) => raw
                .parse::<i64>()
                .map(Some)
                .map_err(|_| Error::InvalidRequest(format!("ttl is not an integer: {raw}"))),
        }
    }

    /// Parse the tagged update operation for this request's type
    pub fn update_op(&self) -> Result<UpdateOp> {
        match self.editable_kind()? {
            KeyType::String => Ok(UpdateOp::StringSet {
                value: self.require_value()?,
            }),
            KeyType::Hash => {
                if let Some(field) = &self.field {
                    Ok(UpdateOp::HashSet {
                        field: field.clone(),
                        value: self.require_value()?,
                    })
                } else if self.is_inline_edit() {
                    Ok(UpdateOp::HashSet {
                        field: self.require_pk()?,
                        value: self.require_value()?,
                    })
                } else {
                    Err(Error::InvalidRequest(
                        "hash update needs a field or an inline edit".to_string(),
                    ))
                }
            }
            KeyType::List => {
                if let Some(side) = &self.push {
                    let side = match side.as_str() {
                        "left" => PushSide::Left,
                        "right" => PushSide::Right,
                        other => {
                            return Err(Error::InvalidRequest(format!(
                                "push side must be left or right, got {other}"
                            )));
                        }
                    };
                    let item = self.item.clone().ok_or_else(|| {
                        Error::InvalidRequest("list push needs an item".to_string())
                    })?;
                    Ok(UpdateOp::ListPush { side, item })
                } else if self.is_inline_edit() {
                    Ok(UpdateOp::ListSet {
                        index: parse_i64("pk", &self.require_pk()?)?,
                        value: self.require_value()?,
                    })
                } else {
                    Err(Error::InvalidRequest(
                        "list update needs a push direction or an inline edit".to_string(),
                    ))
                }
            }
            KeyType::Set => {
                if let Some(member) = &self.member {
                    Ok(UpdateOp::SetAdd {
                        member: member.clone(),
                    })
                } else if self.is_inline_edit() {
                    Ok(UpdateOp::SetSwap {
                        old: self.require_pk()?,
                        new: self.require_value()?,
                    })
                } else {
                    Err(Error::InvalidRequest(
                        "set update needs a member or an inline edit".to_string(),
                    ))
                }
            }
            KeyType::Zset => {
                if let Some(member) = &self.member {
                    let score = self.score.as_deref().ok_or_else(|| {
                        Error::InvalidRequest("sorted set update needs a score".to_string())
                    })?;
                    Ok(UpdateOp::ZsetAdd {
                        member: member.clone(),
                        score: parse_f64("score", score)?,
                    })
                } else if self.is_inline_edit() {
                    Ok(UpdateOp::ZsetAdd {
                        member: self.require_pk()?,
                        score: parse_f64("value", &self.require_value()?)?,
                    })
                } else {
                    Err(Error::InvalidRequest(
                        "sorted set update needs a member or an inline edit".to_string(),
                    ))
                }
            }
            _ => unreachable!(),
        }
    }

    /// Parse the tagged create operation for this request's type
    pub fn store_op(&self) -> Result<StoreOp> {
        match self.editable_kind()? {
            KeyType::String => Ok(StoreOp::String {
                value: self.require_value()?,
            }),
            KeyType::Hash => Ok(StoreOp::Hash {
                field: self
                    .field
                    .clone()
                    .ok_or_else(|| Error::InvalidRequest("hash store needs a field".to_string()))?,
                value: self.require_value()?,
            }),
            KeyType::List => Ok(StoreOp::List {
                item: self
                    .item
                    .clone()
                    .ok_or_else(|| Error::InvalidRequest("list store needs an item".to_string()))?,
            }),
            KeyType::Set => {
                let members = self.members.clone().unwrap_or_default();
                if members.is_empty() {
                    return Err(Error::InvalidRequest(
                        "set store needs at least one member".to_string(),
                    ));
                }
                Ok(StoreOp::Set { members })
            }
            KeyType::Zset => {
                let member = self.member.clone().ok_or_else(|| {
                    Error::InvalidRequest("sorted set store needs a member".to_string())
                })?;
                let score = self.score.as_deref().ok_or_else(|| {
                    Error::InvalidRequest("sorted set store needs a score".to_string())
                })?;
                Ok(StoreOp::Zset {
                    member,
                    score: parse_f64("score", score)?,
                })
            }
            _ => unreachable!(),
        }
    }

    /// Parse the tagged element-removal operation for this request's type
    pub fn remove_op(&self) -> Result<RemoveOp> {
        match self.editable_kind()? {
            KeyType::String => Err(Error::NotSupported(
                "strings have no removable elements; delete the key instead".to_string(),
            )),
            KeyType::Hash => Ok(RemoveOp::HashField {
                field: self.field.clone().ok_or_else(|| {
                    Error::InvalidRequest("hash remove needs a field".to_string())
                })?,
            }),
            KeyType::List => {
                let index = self.index.as_deref().ok_or_else(|| {
                    Error::InvalidRequest("list remove needs an index".to_string())
                })?;
                Ok(RemoveOp::ListIndex {
                    index: parse_i64("index", index)?,
                })
            }
            KeyType::Set => Ok(RemoveOp::SetMember {
                member: self.require_member()?,
            }),
            KeyType::Zset => Ok(RemoveOp::ZsetMember {
                member: self.require_member()?,
            }),
            _ => unreachable!(),
        }
    }

    /// The request's type, restricted to the five editable structures
    fn editable_kind(&self) -> Result<KeyType> {
        match self.kind()? {
            kind @ (KeyType::String
            | KeyType::Hash
            | KeyType::List
            | KeyType::Set
            | KeyType::Zset) => Ok(kind),
            other => Err(Error::UnsupportedType(other.as_str().to_string())),
        }
    }

    fn require_value(&self) -> Result<String> {
        self.value
            .clone()
            .ok_or_else(|| Error::InvalidRequest("missing value".to_string()))
    }

    fn require_pk(&self) -> Result<String> {
        self.pk
            .clone()
            .ok_or_else(|| Error::InvalidRequest("inline edit without a pk".to_string()))
    }

    fn require_member(&self) -> Result<String> {
        self.member
            .clone()
            .ok_or_else(|| Error::InvalidRequest("missing member".to_string()))
    }
}

fn parse_i64(name: &str, raw: &str) -> Result<i64> {
    raw.parse::<i64>()
        .map_err(|_| Error::InvalidRequest(format!("{name} is not an integer: {raw}")))
}

fn parse_f64(name: &str, raw: &str) -> Result<f64> {
    raw.parse::<f64>()
        .map_err(|_| Error::InvalidRequest(format!("{name} is not a number: {raw}")))
}
