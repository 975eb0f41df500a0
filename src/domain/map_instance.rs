// Map instance domain model
use super::parameter::Parameter;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct MapInstance {
    pub id: String,
    pub parameter: String,
    pub title: String,
}

impl MapInstance {
    pub fn new(parameter: &Parameter) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            parameter: parameter.id.to_string(),
            title: parameter.name.to_string(),
        }
    }

    pub fn set_parameter(&mut self, parameter: &Parameter) {
        self.parameter = parameter.id.to_string();
        self.title = parameter.name.to_string();
    }
}
