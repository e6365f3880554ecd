//! Response models for the hub's model listing endpoint.

use serde::{Deserialize, Serialize};

/// One entry of `GET /api/models`. Only the fields dltrack reads are modelled;
/// the rest of the payload is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ModelInfo {
    /// Full repository id, `<namespace>/<name>`.
    pub id: String,
    /// Download count reported by the hub. Absent for some listings.
    #[serde(default)]
    pub downloads: Option<u64>,
    /// Like count.
    #[serde(default)]
    pub likes: Option<u64>,
    /// Whether the repository is private.
    #[serde(default)]
    pub private: Option<bool>,
    /// Creation timestamp as reported by the hub.
    #[serde(default, rename = "createdAt")]
    pub created_at: Option<String>,
}

impl ModelInfo {
    /// Model name with a leading `<namespace>/` removed.
    pub fn short_name<'a>(&'a self, namespace: &str) -> &'a str {
        self.id
            .strip_prefix(namespace)
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_deserialization() {
        let json = r#"[
            {
                "_id": "65f0c0ffee",
                "id": "vismatch/superpoint-lightglue",
                "likes": 3,
                "downloads": 1234,
                "trendingScore": 0,
                "private": false,
                "tags": ["image-matching"],
                "createdAt": "2024-03-01T10:00:00.000Z",
                "modelId": "vismatch/superpoint-lightglue"
            },
            {
                "id": "vismatch/loftr"
            }
        ]"#;

        let models: Vec<ModelInfo> = serde_json::from_str(json).unwrap();
        assert_eq!(models.len(), 2);
        assert_eq!(models[0].downloads, Some(1234));
        assert_eq!(models[0].likes, Some(3));
        assert_eq!(models[0].created_at.as_deref(), Some("2024-03-01T10:00:00.000Z"));
        assert_eq!(models[1].downloads, None);
    }

    #[test]
    fn test_short_name() {
        let model = ModelInfo {
            id: "vismatch/loftr".to_string(),
            downloads: None,
            likes: None,
            private: None,
            created_at: None,
        };
        assert_eq!(model.short_name("vismatch"), "loftr");
        assert_eq!(model.short_name("other"), "vismatch/loftr");
        assert_eq!(model.short_name("vis"), "vismatch/loftr");
    }
}
