use crate::state::list::team_name;
use crate::state::validation::{
    FieldKind, FieldSet, FieldSpec, Rule, format_datetime, parse_datetime, parse_integer,
};
use liga_api::{Entity, Match, POSITIONS, Player, RecordId, Team};

/// Per-entity bindings shared by the list and form controllers: the field
/// set and its rules, table columns, and conversion between records and
/// form values.
pub trait Schema: Entity {
    const FIELDS: &'static [FieldSpec];
    const COLUMNS: &'static [&'static str];
    /// Rows and pickers reference teams, so the team collection is loaded too.
    const USES_TEAMS: bool;
    /// Label shown when a referenced team is not in the loaded collection.
    const MISSING_TEAM: &'static str = "Unknown";

    fn row(&self, teams: &[Team]) -> Vec<String>;

    fn field_values(&self) -> Vec<(&'static str, String)>;

    /// Builds the outgoing record from a field set that passed validation.
    fn from_fields(id: RecordId, fields: &FieldSet) -> Option<Self>;

    /// Rules spanning several fields, checked after per-field validation.
    fn cross_check(_fields: &FieldSet) -> Option<&'static str> {
        None
    }
}

fn integer(fields: &FieldSet, key: &str) -> Option<i64> {
    parse_integer(fields.value(key))
}

fn text(fields: &FieldSet, key: &str) -> String {
    fields.value(key).trim().to_string()
}

// ---------------------------------------------------------------------------
// Team
// ---------------------------------------------------------------------------

static TEAM_FIELDS: [FieldSpec; 4] = [
    FieldSpec {
        key: "name",
        label: "Name",
        kind: FieldKind::Text,
        rules: &[Rule::Required, Rule::MinLength(3)],
    },
    FieldSpec { key: "city", label: "City", kind: FieldKind::Text, rules: &[Rule::Required] },
    FieldSpec { key: "stadium", label: "Stadium", kind: FieldKind::Text, rules: &[Rule::Required] },
    FieldSpec {
        key: "founding_year",
        label: "Founded",
        kind: FieldKind::Integer,
        rules: &[Rule::Required, Rule::Min(1800), Rule::Max(2024)],
    },
];

impl Schema for Team {
    const FIELDS: &'static [FieldSpec] = &TEAM_FIELDS;
    const COLUMNS: &'static [&'static str] = &["Name", "City", "Stadium", "Founded"];
    const USES_TEAMS: bool = false;

    fn row(&self, _teams: &[Team]) -> Vec<String> {
        vec![
            self.name.clone(),
            self.city.clone(),
            self.stadium.clone(),
            self.founding_year.to_string(),
        ]
    }

    fn field_values(&self) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.name.clone()),
            ("city", self.city.clone()),
            ("stadium", self.stadium.clone()),
            ("founding_year", self.founding_year.to_string()),
        ]
    }

    fn from_fields(id: RecordId, fields: &FieldSet) -> Option<Self> {
        Some(Team {
            id,
            name: text(fields, "name"),
            city: text(fields, "city"),
            stadium: text(fields, "stadium"),
            founding_year: i32::try_from(integer(fields, "founding_year")?).ok()?,
        })
    }
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

static PLAYER_FIELDS: [FieldSpec; 4] = [
    FieldSpec {
        key: "name",
        label: "Name",
        kind: FieldKind::Text,
        rules: &[Rule::Required, Rule::MinLength(3)],
    },
    FieldSpec {
        key: "position",
        label: "Position",
        kind: FieldKind::Choice(&POSITIONS),
        rules: &[Rule::Required],
    },
    FieldSpec {
        key: "age",
        label: "Age",
        kind: FieldKind::Integer,
        rules: &[Rule::Required, Rule::Min(16), Rule::Max(45)],
    },
    FieldSpec { key: "team_id", label: "Team", kind: FieldKind::TeamRef, rules: &[Rule::Required] },
];

impl Schema for Player {
    const FIELDS: &'static [FieldSpec] = &PLAYER_FIELDS;
    const COLUMNS: &'static [&'static str] = &["Name", "Position", "Age", "Team"];
    const USES_TEAMS: bool = true;
    const MISSING_TEAM: &'static str = "No team";

    fn row(&self, teams: &[Team]) -> Vec<String> {
        vec![
            self.name.clone(),
            self.position.clone(),
            self.age.to_string(),
            team_name(teams, self.team_id, Self::MISSING_TEAM).to_string(),
        ]
    }

    fn field_values(&self) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.name.clone()),
            ("position", self.position.clone()),
            ("age", self.age.to_string()),
            ("team_id", self.team_id.to_string()),
        ]
    }

    fn from_fields(id: RecordId, fields: &FieldSet) -> Option<Self> {
        Some(Player {
            id,
            name: text(fields, "name"),
            position: text(fields, "position"),
            age: i32::try_from(integer(fields, "age")?).ok()?,
            team_id: RecordId::try_from(integer(fields, "team_id")?).ok()?,
        })
    }
}

// ---------------------------------------------------------------------------
// Match
// ---------------------------------------------------------------------------

static MATCH_FIELDS: [FieldSpec; 5] = [
    FieldSpec {
        key: "home_team_id",
        label: "Home team",
        kind: FieldKind::TeamRef,
        rules: &[Rule::Required],
    },
    FieldSpec {
        key: "away_team_id",
        label: "Away team",
        kind: FieldKind::TeamRef,
        rules: &[Rule::Required],
    },
    FieldSpec { key: "date", label: "Date", kind: FieldKind::DateTime, rules: &[Rule::Required] },
    FieldSpec { key: "result", label: "Result", kind: FieldKind::Text, rules: &[] },
    FieldSpec { key: "stadium", label: "Stadium", kind: FieldKind::Text, rules: &[Rule::Required] },
];

pub const SAME_TEAMS_MESSAGE: &str = "Home and away teams must be different";

impl Schema for Match {
    const FIELDS: &'static [FieldSpec] = &MATCH_FIELDS;
    const COLUMNS: &'static [&'static str] = &["Home", "Away", "Date", "Result", "Stadium"];
    const USES_TEAMS: bool = true;

    fn row(&self, teams: &[Team]) -> Vec<String> {
        vec![
            team_name(teams, self.home_team_id, Self::MISSING_TEAM).to_string(),
            team_name(teams, self.away_team_id, Self::MISSING_TEAM).to_string(),
            self.date.format("%d %b %Y").to_string(),
            self.result.clone().unwrap_or_else(|| "-".to_string()),
            self.stadium.clone(),
        ]
    }

    fn field_values(&self) -> Vec<(&'static str, String)> {
        vec![
            ("home_team_id", self.home_team_id.to_string()),
            ("away_team_id", self.away_team_id.to_string()),
            ("date", format_datetime(&self.date)),
            ("result", self.result.clone().unwrap_or_default()),
            ("stadium", self.stadium.clone()),
        ]
    }

    fn from_fields(id: RecordId, fields: &FieldSet) -> Option<Self> {
        let result = text(fields, "result");
        Some(Match {
            id,
            home_team_id: RecordId::try_from(integer(fields, "home_team_id")?).ok()?,
            away_team_id: RecordId::try_from(integer(fields, "away_team_id")?).ok()?,
            date: parse_datetime(fields.value("date"))?,
            result: (!result.is_empty()).then_some(result),
            stadium: text(fields, "stadium"),
        })
    }

    fn cross_check(fields: &FieldSet) -> Option<&'static str> {
        let home = integer(fields, "home_team_id");
        (home.is_some() && home == integer(fields, "away_team_id")).then_some(SAME_TEAMS_MESSAGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn fields_for<T: Schema>(values: &[(&str, &str)]) -> FieldSet {
        let mut set = FieldSet::new(T::FIELDS);
        for (k, v) in values {
            set.set(k, *v);
        }
        set
    }

    #[test]
    fn team_schema_accepts_real_madrid() {
        let set = fields_for::<Team>(&[
            ("name", "Real Madrid"),
            ("city", "Madrid"),
            ("stadium", "Bernabéu"),
            ("founding_year", "1902"),
        ]);
        assert!(set.is_valid());
        let team = Team::from_fields(0, &set).unwrap();
        assert_eq!(team.founding_year, 1902);
        assert_eq!(team.id, 0);
    }

    #[test]
    fn team_founding_year_bounds() {
        let spec = &Team::FIELDS[3];
        assert!(spec.check("1800").is_none());
        assert!(spec.check("2024").is_none());
        assert!(spec.check("1799").is_some());
        assert!(spec.check("2025").is_some());
    }

    #[test]
    fn player_age_lower_bound_is_sixteen() {
        let base = [
            ("name", "Ana Ruiz"),
            ("position", "Delantero Centro"),
            ("team_id", "1"),
        ];
        let mut ok = fields_for::<Player>(&base);
        ok.set("age", "16");
        assert!(ok.is_valid());

        let mut young = fields_for::<Player>(&base);
        young.set("age", "15");
        assert!(!young.is_valid());
    }

    #[test]
    fn player_row_falls_back_to_no_team() {
        let player = Player { team_id: 42, ..Default::default() };
        let teams = vec![Team { id: 1, name: "Sevilla".into(), ..Default::default() }];
        assert_eq!(player.row(&teams)[3], "No team");
    }

    #[test]
    fn match_row_resolves_names_and_formats_date() {
        let teams = vec![
            Team { id: 1, name: "Betis".into(), ..Default::default() },
            Team { id: 2, name: "Sevilla".into(), ..Default::default() },
        ];
        let m = Match {
            id: 1,
            home_team_id: 1,
            away_team_id: 3,
            date: NaiveDate::from_ymd_opt(2024, 3, 9).unwrap().and_hms_opt(21, 0, 0).unwrap(),
            result: None,
            stadium: "Villamarín".into(),
        };
        assert_eq!(m.row(&teams), vec!["Betis", "Unknown", "09 Mar 2024", "-", "Villamarín"]);
    }

    #[test]
    fn match_fields_round_trip_and_blank_result_is_absent() {
        let m = Match {
            id: 5,
            home_team_id: 1,
            away_team_id: 2,
            date: NaiveDate::from_ymd_opt(2024, 3, 9).unwrap().and_hms_opt(21, 0, 0).unwrap(),
            result: None,
            stadium: "Villamarín".into(),
        };
        let mut set = FieldSet::new(Match::FIELDS);
        set.patch(m.field_values());
        assert!(set.is_valid());
        assert_eq!(Match::from_fields(5, &set), Some(m));
    }

    #[test]
    fn match_cross_check_rejects_same_team() {
        let set = fields_for::<Match>(&[("home_team_id", "2"), ("away_team_id", "2")]);
        assert_eq!(Match::cross_check(&set), Some(SAME_TEAMS_MESSAGE));
        let set = fields_for::<Match>(&[("home_team_id", "2"), ("away_team_id", "3")]);
        assert_eq!(Match::cross_check(&set), None);
    }
}
