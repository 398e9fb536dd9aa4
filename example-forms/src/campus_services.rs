use campus_forms::FormDefinition;

/// JSON source of the campus services survey.
pub const CAMPUS_SERVICES_JSON: &str = include_str!("../forms/campus_services.json");

/// Campus services survey, loaded from its JSON definition.
pub fn campus_services() -> serde_json::Result<FormDefinition> {
    serde_json::from_str(CAMPUS_SERVICES_JSON)
}
