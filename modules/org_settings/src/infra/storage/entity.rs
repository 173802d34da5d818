//! SeaORM entities for database tables

use sea_orm::entity::prelude::*;

/// Organizations table entity
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "organizations")]
pub struct Model {
    /// Organization ID
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub name: String,

    #[sea_orm(unique)]
    pub slug: String,

    /// Attributes blob; generic overrides under "settings"
    pub settings: Json,

    /// Allowed Google Apps domains (JSON array of strings)
    pub google_apps_domains: Json,

    pub created_at: DateTimeUtc,

    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One-to-many relationship with events
    #[sea_orm(has_many = "event::Entity")]
    Events,
}

impl Related<event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Events.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Change event module
pub mod event {
    use sea_orm::entity::prelude::*;

    /// Events table entity
    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "events")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,

        pub org_id: Uuid,

        pub user_id: Uuid,

        pub action: String,

        pub object_type: String,

        pub object_id: String,

        /// `{"new_values": {...}, "previous_values": {...}}`
        pub additional_properties: Json,

        pub created_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::Entity",
            from = "Column::OrgId",
            to = "super::Column::Id"
        )]
        Organization,
    }

    impl Related<super::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Organization.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}
