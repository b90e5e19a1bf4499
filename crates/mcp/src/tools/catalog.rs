// Haven API tool catalogue: one tool per SDK endpoint

use super::registry::{
    json_schema_array, json_schema_boolean, json_schema_enum, json_schema_integer,
    json_schema_object, json_schema_string,
};
use haven_core::{HttpMethod, ToolDefinition};
use serde_json::json;

const DEVICE_PLATFORMS: &[&str] = &[
    "ios", "android", "windows", "macos", "chromeos", "console", "other",
];

const CONTENT_RATINGS: &[&str] = &[
    "all_ages",
    "seven_plus",
    "twelve_plus",
    "sixteen_plus",
    "adult",
];

const PLATFORM_CATEGORIES: &[&str] = &[
    "streaming",
    "social",
    "gaming",
    "messaging",
    "education",
    "browser",
    "other",
];

/// Every tool the server exposes by default
pub fn tools() -> Vec<ToolDefinition> {
    let mut tools = vec![health_tool()];
    tools.extend(family_tools());
    tools.extend(child_tools());
    tools.extend(policy_tools());
    tools.extend(device_tools());
    tools.extend(platform_tools());
    tools
}

fn health_tool() -> ToolDefinition {
    ToolDefinition::new(
        "health_check",
        "Check that the Haven API is reachable and healthy",
        HttpMethod::Get,
        "/health",
        json_schema_object(json!({}), vec![]),
    )
}

fn family_tools() -> Vec<ToolDefinition> {
    let family_id = || json_schema_string("Family ID");

    vec![
        ToolDefinition::new(
            "list_families",
            "List the families visible to this API key",
            HttpMethod::Get,
            "/families",
            json_schema_object(json!({}), vec![]),
        ),
        ToolDefinition::new(
            "get_family",
            "Get a family by ID",
            HttpMethod::Get,
            "/families/{familyId}",
            json_schema_object(json!({ "familyId": family_id() }), vec!["familyId"]),
        ),
        ToolDefinition::new(
            "create_family",
            "Create a family",
            HttpMethod::Post,
            "/families",
            json_schema_object(
                json!({
                    "name": json_schema_string("Display name of the family"),
                    "timezone": json_schema_string("IANA timezone, e.g. Europe/Berlin")
                }),
                vec!["name"],
            ),
        ),
        ToolDefinition::new(
            "update_family",
            "Rename a family or change its timezone",
            HttpMethod::Put,
            "/families/{familyId}",
            json_schema_object(
                json!({
                    "familyId": family_id(),
                    "name": json_schema_string("New display name"),
                    "timezone": json_schema_string("IANA timezone")
                }),
                vec!["familyId"],
            ),
        ),
        ToolDefinition::new(
            "delete_family",
            "Delete a family and everything under it",
            HttpMethod::Delete,
            "/families/{familyId}",
            json_schema_object(json!({ "familyId": family_id() }), vec!["familyId"]),
        ),
    ]
}

fn child_tools() -> Vec<ToolDefinition> {
    let child_id = || json_schema_string("Child ID");

    vec![
        ToolDefinition::new(
            "list_children",
            "List the children in a family",
            HttpMethod::Get,
            "/families/{familyId}/children",
            json_schema_object(
                json!({ "familyId": json_schema_string("Family ID") }),
                vec!["familyId"],
            ),
        ),
        ToolDefinition::new(
            "create_child",
            "Add a child to a family",
            HttpMethod::Post,
            "/families/{familyId}/children",
            json_schema_object(
                json!({
                    "familyId": json_schema_string("Family ID"),
                    "name": json_schema_string("Child's name"),
                    "birth_date": json_schema_string("Birth date as YYYY-MM-DD")
                }),
                vec!["familyId", "name", "birth_date"],
            ),
        ),
        ToolDefinition::new(
            "get_child",
            "Get a child profile by ID",
            HttpMethod::Get,
            "/children/{childId}",
            json_schema_object(json!({ "childId": child_id() }), vec!["childId"]),
        ),
        ToolDefinition::new(
            "update_child",
            "Update a child's name or birth date",
            HttpMethod::Put,
            "/children/{childId}",
            json_schema_object(
                json!({
                    "childId": child_id(),
                    "name": json_schema_string("Child's name"),
                    "birth_date": json_schema_string("Birth date as YYYY-MM-DD")
                }),
                vec!["childId"],
            ),
        ),
        ToolDefinition::new(
            "delete_child",
            "Remove a child profile",
            HttpMethod::Delete,
            "/children/{childId}",
            json_schema_object(json!({ "childId": child_id() }), vec!["childId"]),
        ),
    ]
}

fn policy_tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "get_child_policy",
            "Get the screen-time and content policy for a child",
            HttpMethod::Get,
            "/children/{childId}/policy",
            json_schema_object(
                json!({ "childId": json_schema_string("Child ID") }),
                vec!["childId"],
            ),
        ),
        ToolDefinition::new(
            "update_child_policy",
            "Replace the screen-time and content policy for a child",
            HttpMethod::Put,
            "/children/{childId}/policy",
            json_schema_object(
                json!({
                    "childId": json_schema_string("Child ID"),
                    "daily_screen_minutes": json_schema_integer("Daily screen-time allowance in minutes"),
                    "bedtime": json_schema_object(
                        json!({
                            "start": json_schema_string("Lock time as HH:MM:SS"),
                            "end": json_schema_string("Unlock time as HH:MM:SS")
                        }),
                        vec!["start", "end"],
                    ),
                    "max_rating": json_schema_enum(CONTENT_RATINGS, "Highest content rating allowed"),
                    "blocked_platforms": json_schema_array(
                        json_schema_string("Platform ID"),
                        "Platforms the child may not use"
                    )
                }),
                vec!["childId", "max_rating"],
            ),
        ),
    ]
}

fn device_tools() -> Vec<ToolDefinition> {
    let device_id = || json_schema_string("Device ID");

    vec![
        ToolDefinition::new(
            "list_devices",
            "List the devices enrolled for a child",
            HttpMethod::Get,
            "/children/{childId}/devices",
            json_schema_object(
                json!({ "childId": json_schema_string("Child ID") }),
                vec!["childId"],
            ),
        ),
        ToolDefinition::new(
            "register_device",
            "Enroll a device for a child",
            HttpMethod::Post,
            "/children/{childId}/devices",
            json_schema_object(
                json!({
                    "childId": json_schema_string("Child ID"),
                    "name": json_schema_string("Device name, e.g. Emma's iPad"),
                    "platform": json_schema_enum(DEVICE_PLATFORMS, "Device operating system")
                }),
                vec!["childId", "name", "platform"],
            ),
        ),
        ToolDefinition::new(
            "get_device",
            "Get a device by ID",
            HttpMethod::Get,
            "/devices/{deviceId}",
            json_schema_object(json!({ "deviceId": device_id() }), vec!["deviceId"]),
        ),
        ToolDefinition::new(
            "update_device",
            "Rename a device or pause/resume it",
            HttpMethod::Patch,
            "/devices/{deviceId}",
            json_schema_object(
                json!({
                    "deviceId": device_id(),
                    "name": json_schema_string("New device name"),
                    "paused": json_schema_boolean("Pause all access on the device")
                }),
                vec!["deviceId"],
            ),
        ),
        ToolDefinition::new(
            "remove_device",
            "Unenroll a device",
            HttpMethod::Delete,
            "/devices/{deviceId}",
            json_schema_object(json!({ "deviceId": device_id() }), vec!["deviceId"]),
        ),
    ]
}

fn platform_tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "list_platforms",
            "List catalogued platforms",
            HttpMethod::Get,
            "/platforms",
            json_schema_object(json!({}), vec![]),
        ),
        ToolDefinition::new(
            "list_platforms_by_category",
            "List catalogued platforms in one category",
            HttpMethod::Get,
            "/platforms/by-category",
            json_schema_object(
                json!({ "category": json_schema_enum(PLATFORM_CATEGORIES, "Platform category") }),
                vec!["category"],
            ),
        ),
        ToolDefinition::new(
            "get_platform",
            "Get a platform by ID",
            HttpMethod::Get,
            "/platforms/{platformId}",
            json_schema_object(
                json!({ "platformId": json_schema_string("Platform ID") }),
                vec!["platformId"],
            ),
        ),
    ]
}
