use crate::types::{Faction, NightActionKind, Role, RoleName};

pub fn faction_of(name: RoleName) -> Faction {
    match name {
        RoleName::Ai | RoleName::FakeAi => Faction::Ai,
        RoleName::Engineer | RoleName::CyberGuard | RoleName::Citizen => Faction::Human,
        RoleName::Trickster => Faction::Third,
    }
}

pub fn display_name_of(name: RoleName) -> &'static str {
    match name {
        RoleName::Ai => "AI",
        RoleName::Engineer => "Engineer",
        RoleName::CyberGuard => "Cyber Guard",
        RoleName::Citizen => "Citizen",
        RoleName::FakeAi => "Fake AI",
        RoleName::Trickster => "Trickster",
    }
}

pub fn role_for(name: RoleName) -> Role {
    Role {
        name,
        faction: faction_of(name),
        display_name: display_name_of(name).to_string(),
    }
}

/// The night action a role is entitled to, if any.
pub fn night_action_for(name: RoleName) -> Option<NightActionKind> {
    match name {
        RoleName::Ai => Some(NightActionKind::Attack),
        RoleName::Engineer => Some(NightActionKind::Investigate),
        RoleName::CyberGuard => Some(NightActionKind::Protect),
        RoleName::Citizen | RoleName::FakeAi | RoleName::Trickster => None,
    }
}

pub fn is_wildcard(name: RoleName) -> bool {
    name == RoleName::Trickster
}
