use liga_api::{EntityKind, RecordId};
use std::fmt;

/// Navigation targets. Each collection has a list, a create form and an
/// edit form keyed by record id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    List(EntityKind),
    New(EntityKind),
    Edit(EntityKind, RecordId),
}

impl Default for Route {
    fn default() -> Self {
        Route::List(EntityKind::Team)
    }
}

impl Route {
    pub fn entity(&self) -> EntityKind {
        match self {
            Route::List(kind) | Route::New(kind) | Route::Edit(kind, _) => *kind,
        }
    }

    /// Parses `/teams`, `/teams/new`, `/teams/edit/3` (and the same for
    /// players and matches). Anything else lands on the default list.
    pub fn parse(path: &str) -> Self {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let kind = match segments.first().copied() {
            Some("teams") => EntityKind::Team,
            Some("players") => EntityKind::Player,
            Some("matches") => EntityKind::Match,
            _ => return Route::default(),
        };

        match segments.as_slice() {
            [_] => Route::List(kind),
            [_, "new"] => Route::New(kind),
            [_, "edit", id] => match id.parse::<RecordId>() {
                Ok(id) if id > 0 => Route::Edit(kind, id),
                _ => Route::default(),
            },
            _ => Route::default(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let base = self.entity().plural();
        match self {
            Route::List(_) => write!(f, "/{base}"),
            Route::New(_) => write!(f, "/{base}/new"),
            Route::Edit(_, id) => write!(f, "/{base}/edit/{id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_sub_route() {
        assert_eq!(Route::parse("/players"), Route::List(EntityKind::Player));
        assert_eq!(Route::parse("/matches/new"), Route::New(EntityKind::Match));
        assert_eq!(Route::parse("/teams/edit/12"), Route::Edit(EntityKind::Team, 12));
        assert_eq!(Route::parse("players/"), Route::List(EntityKind::Player));
    }

    #[test]
    fn unknown_routes_redirect_to_teams() {
        for path in ["", "/", "/stadiums", "/teams/edit", "/teams/edit/abc", "/teams/edit/0", "/players/new/extra"] {
            assert_eq!(Route::parse(path), Route::List(EntityKind::Team), "{path}");
        }
    }

    #[test]
    fn display_is_the_inverse_of_parse() {
        for route in [
            Route::List(EntityKind::Match),
            Route::New(EntityKind::Team),
            Route::Edit(EntityKind::Player, 7),
        ] {
            assert_eq!(Route::parse(&route.to_string()), route);
        }
    }
}
