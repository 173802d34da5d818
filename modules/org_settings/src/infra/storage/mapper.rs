//! Entity to model mappers
//!
//! Conversions between SeaORM entities and contract models

use super::entity;
use crate::contract::{Organization, SettingsMap};
use crate::domain::ChangeEvent;
use serde_json::{json, Value};

// ===== Organization Conversions =====

impl TryFrom<entity::Model> for Organization {
    type Error = anyhow::Error;

    fn try_from(entity: entity::Model) -> Result<Self, Self::Error> {
        let settings = match entity.settings {
            Value::Object(map) => map,
            Value::Null => SettingsMap::new(),
            other => anyhow::bail!(
                "organization {} has a non-object settings column: {}",
                entity.id,
                other
            ),
        };

        let google_apps_domains = match entity.google_apps_domains {
            Value::Null => Vec::new(),
            domains => serde_json::from_value(domains)?,
        };

        Ok(Self {
            id: entity.id,
            name: entity.name,
            slug: entity.slug,
            settings,
            google_apps_domains,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }
}

impl From<&Organization> for entity::ActiveModel {
    fn from(model: &Organization) -> Self {
        use sea_orm::ActiveValue::*;

        Self {
            id: Set(model.id),
            name: Set(model.name.clone()),
            slug: Set(model.slug.clone()),
            settings: Set(Value::Object(model.settings.clone())),
            google_apps_domains: Set(Value::from(model.google_apps_domains.clone())),
            created_at: Set(model.created_at),
            updated_at: Set(model.updated_at),
        }
    }
}

// ===== Event Conversions =====

impl From<&ChangeEvent> for entity::event::ActiveModel {
    fn from(event: &ChangeEvent) -> Self {
        use sea_orm::ActiveValue::*;

        Self {
            id: Set(uuid::Uuid::new_v4()),
            org_id: Set(event.org_id),
            user_id: Set(event.user_id),
            action: Set(event.action.clone()),
            object_type: Set(event.object_type.clone()),
            object_id: Set(event.object_id.clone()),
            additional_properties: Set(json!({
                "new_values": event.new_values,
                "previous_values": event.previous_values,
            })),
            created_at: Set(event.created_at),
        }
    }
}

impl TryFrom<entity::event::Model> for ChangeEvent {
    type Error = anyhow::Error;

    fn try_from(entity: entity::event::Model) -> Result<Self, Self::Error> {
        let mut properties = match entity.additional_properties {
            Value::Object(map) => map,
            other => anyhow::bail!("event {} has malformed properties: {}", entity.id, other),
        };
        let mut take_map = |key: &str| match properties.remove(key) {
            Some(Value::Object(map)) => map,
            _ => SettingsMap::new(),
        };

        Ok(Self {
            action: entity.action,
            object_id: entity.object_id,
            object_type: entity.object_type,
            new_values: take_map("new_values"),
            previous_values: take_map("previous_values"),
            org_id: entity.org_id,
            user_id: entity.user_id,
            created_at: entity.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn row(settings: Value, domains: Value) -> entity::Model {
        entity::Model {
            id: Uuid::new_v4(),
            name: "Acme".to_string(),
            slug: "acme".to_string(),
            settings,
            google_apps_domains: domains,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn null_columns_map_to_empty_values() {
        let org = Organization::try_from(row(Value::Null, Value::Null)).unwrap();
        assert!(org.settings.is_empty());
        assert!(org.google_apps_domains.is_empty());
    }

    #[test]
    fn non_object_settings_column_is_an_error() {
        assert!(Organization::try_from(row(json!([1]), json!([]))).is_err());
    }

    #[test]
    fn nested_overrides_survive_mapping() {
        let org = Organization::try_from(row(
            json!({"settings": {"date_format": "YYYY"}}),
            json!(["acme.com"]),
        ))
        .unwrap();

        assert_eq!(org.get_setting("date_format"), Some(&json!("YYYY")));
        assert_eq!(org.google_apps_domains, vec!["acme.com".to_string()]);
    }
}
