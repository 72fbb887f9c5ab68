//! Entity kinds served by the admin API.
//!
//! The remote identifier arrives as `_id` and is normalized to the local `id`
//! field on ingestion; `id` is never serialized back (the server assigns it).

use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::Date;

use crate::resource::{Resource, SortValue};

/// Parse a `YYYY-MM-DD` date field. Returns `None` when malformed, which the
/// sorted projection orders last.
pub fn parse_date(s: &str) -> Option<Date> {
    let format = format_description!("[year]-[month]-[day]");
    Date::parse(s.trim(), &format).ok()
}

// =============================================================================
// Booking
// =============================================================================

/// A service booking submitted through the public site.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    #[serde(rename = "_id", default, skip_serializing)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub service: String,
    /// Requested date, `YYYY-MM-DD`.
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub message: String,
}

impl Resource for Booking {
    const COLLECTION: &'static str = "booking";

    fn id(&self) -> &str {
        &self.id
    }

    fn search_text(&self) -> Vec<&str> {
        vec![&self.name, &self.email, &self.service, &self.phone]
    }

    fn sort_key(&self) -> SortValue<'_> {
        SortValue::Date(parse_date(&self.date))
    }

    fn summary(&self) -> String {
        format!(
            "{} <{}> {} on {} {}",
            self.name, self.email, self.service, self.date, self.time
        )
    }

    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name is required".into());
        }
        if self.email.trim().is_empty() {
            return Err("email is required".into());
        }
        if !self.date.trim().is_empty() && parse_date(&self.date).is_none() {
            return Err(format!("date '{}' is not YYYY-MM-DD", self.date));
        }
        Ok(())
    }
}

// =============================================================================
// Contact message
// =============================================================================

/// A message submitted through the public contact form. Read and delete only;
/// the console never creates or edits these.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactMessage {
    #[serde(rename = "_id", default, skip_serializing)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Resource for ContactMessage {
    const COLLECTION: &'static str = "contact";
    const EDITABLE: bool = false;

    fn id(&self) -> &str {
        &self.id
    }

    fn search_text(&self) -> Vec<&str> {
        vec![&self.name, &self.email, &self.message]
    }

    fn sort_key(&self) -> SortValue<'_> {
        SortValue::Text(&self.name)
    }

    fn summary(&self) -> String {
        format!("{} <{}>: {}", self.name, self.email, self.message)
    }
}

// =============================================================================
// Gallery item
// =============================================================================

/// One image in the site gallery.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GalleryItem {
    #[serde(rename = "_id", default, skip_serializing)]
    pub id: String,
    /// Media type, `"type"` on the wire.
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub category: String,
    /// Source URL of the image.
    #[serde(default)]
    pub src: String,
    /// Display height, e.g. `"400px"`.
    #[serde(default)]
    pub height: String,
}

impl Resource for GalleryItem {
    const COLLECTION: &'static str = "gallery";

    fn id(&self) -> &str {
        &self.id
    }

    fn search_text(&self) -> Vec<&str> {
        vec![&self.kind, &self.category]
    }

    fn sort_key(&self) -> SortValue<'_> {
        SortValue::Text(&self.category)
    }

    fn summary(&self) -> String {
        format!("{} [{}] {}", self.kind, self.category, self.src)
    }

    fn validate(&self) -> Result<(), String> {
        if self.src.trim().is_empty() {
            return Err("image source URL is required".into());
        }
        if self.kind.trim().is_empty() {
            return Err("type is required".into());
        }
        Ok(())
    }
}

// =============================================================================
// Admin account
// =============================================================================

/// An administrator account. The password is write-only: it is sent when set
/// and never rendered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Admin {
    #[serde(rename = "_id", default, skip_serializing)]
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password: String,
}

impl Resource for Admin {
    const COLLECTION: &'static str = "admin";

    fn id(&self) -> &str {
        &self.id
    }

    fn search_text(&self) -> Vec<&str> {
        vec![&self.email]
    }

    fn sort_key(&self) -> SortValue<'_> {
        SortValue::Text(&self.email)
    }

    fn summary(&self) -> String {
        let password = if self.password.is_empty() {
            "not set"
        } else {
            "********"
        };
        format!("{} (password {})", self.email, password)
    }

    fn validate(&self) -> Result<(), String> {
        if !self.email.contains('@') {
            return Err(format!("'{}' is not a valid email address", self.email));
        }
        Ok(())
    }
}
