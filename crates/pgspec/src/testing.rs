//! Blog-shaped record graph shared by unit tests.

use crate::schema::{Entity, EntityMeta, SchemaRegistry};

pub(crate) struct User;
pub(crate) struct Post;
pub(crate) struct Profile;
pub(crate) struct Group;

impl Entity for User {
    fn entity_name() -> &'static str {
        "User"
    }

    fn entity_meta() -> EntityMeta {
        EntityMeta::new("User", "users")
            .primary_key("id")
            .column("username")
            .column("email")
            .column("age")
            .column_as("active", "is_active")
            .has_one("profile", "Profile", "user_id")
            .has_many("posts", "Post", "author_id")
            .many_to_many("groups", "Group", "user_groups", "user_id", "group_id")
            .element_collection("nicknames", "user_nicknames", "user_id", "nickname")
    }
}

impl Entity for Post {
    fn entity_name() -> &'static str {
        "Post"
    }

    fn entity_meta() -> EntityMeta {
        EntityMeta::new("Post", "posts")
            .primary_key("id")
            .column("title")
            .column("status")
            .column("views")
            .belongs_to("author", "User", "author_id")
    }
}

impl Entity for Profile {
    fn entity_name() -> &'static str {
        "Profile"
    }

    fn entity_meta() -> EntityMeta {
        EntityMeta::new("Profile", "profiles")
            .primary_key("id")
            .column("city")
            .column("phone")
            .belongs_to("user", "User", "user_id")
    }
}

impl Entity for Group {
    fn entity_name() -> &'static str {
        "Group"
    }

    fn entity_meta() -> EntityMeta {
        EntityMeta::new("Group", "groups").primary_key("id").column("name")
    }
}

pub(crate) fn schema() -> SchemaRegistry {
    let mut registry = SchemaRegistry::new();
    registry.register::<User>().unwrap();
    registry.register::<Post>().unwrap();
    registry.register::<Profile>().unwrap();
    registry.register::<Group>().unwrap();
    registry
}
