/// Separator that starts a member or keyword search
pub const MEMBER_SEPARATOR: char = '#';
/// Separator that opens the command menu
pub const MENU_SEPARATOR: char = '@';

/// Which sub-query the search field is currently editing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    Name,
    Member,
    Menu,
}

/// Compound query typed into a single search field.
///
/// The field only ever shows the active segment (`Object`, `#wait` or
/// `@1`); the earlier segments are remembered here so the next keystroke
/// can be folded back into the full `name#member@menu` query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryState {
    name_query: String,
    member_query: Option<String>,
    menu_query: Option<String>,
    field_value: String,
}

impl QueryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold the current text of the search field into the compound query.
    pub fn update(&mut self, raw: &str) {
        let effective = match self.mode() {
            QueryMode::Menu => {
                let mut effective = self.name_query.clone();
                if let Some(member) = &self.member_query {
                    effective.push(MEMBER_SEPARATOR);
                    effective.push_str(member);
                }
                if raw.contains(MENU_SEPARATOR) {
                    effective.push_str(raw);
                }
                effective
            }
            QueryMode::Member => format!("{}{}", self.name_query, raw),
            QueryMode::Name => raw.to_string(),
        };

        let (rest, menu) = match effective.split_once(MENU_SEPARATOR) {
            Some((rest, menu)) => (rest, Some(menu.to_string())),
            None => (effective.as_str(), None),
        };
        let (name, member) = match rest.split_once(MEMBER_SEPARATOR) {
            Some((name, member)) => (name, Some(member.to_string())),
            None => (rest, None),
        };

        self.name_query = name.to_string();
        self.member_query = member;
        self.menu_query = menu;
        self.field_value = self.active_segment();
    }

    /// Reset to an empty name search.
    pub fn erase(&mut self) {
        *self = Self::default();
    }

    /// Drop only the segment being edited: menu, then member, then name.
    pub fn erase_segment(&mut self) {
        match self.mode() {
            QueryMode::Menu => self.menu_query = None,
            QueryMode::Member => self.member_query = None,
            QueryMode::Name => self.name_query.clear(),
        }
        self.field_value = self.active_segment();
    }

    pub fn mode(&self) -> QueryMode {
        if self.menu_query.is_some() {
            QueryMode::Menu
        } else if self.member_query.is_some() {
            QueryMode::Member
        } else {
            QueryMode::Name
        }
    }

    pub fn name_query(&self) -> &str {
        &self.name_query
    }

    pub fn member_query(&self) -> Option<&str> {
        self.member_query.as_deref()
    }

    pub fn menu_query(&self) -> Option<&str> {
        self.menu_query.as_deref()
    }

    /// Text the search field should display
    pub fn field_value(&self) -> &str {
        &self.field_value
    }

    /// The full `name#member@menu` query, used for change detection.
    pub fn entire_query_string(&self) -> String {
        let mut entire = self.name_query.clone();
        if let Some(member) = &self.member_query {
            entire.push(MEMBER_SEPARATOR);
            entire.push_str(member);
        }
        if let Some(menu) = &self.menu_query {
            entire.push(MENU_SEPARATOR);
            entire.push_str(menu);
        }
        entire
    }

    fn active_segment(&self) -> String {
        match (&self.member_query, &self.menu_query) {
            (_, Some(menu)) => format!("{}{}", MENU_SEPARATOR, menu),
            (Some(member), None) => format!("{}{}", MEMBER_SEPARATOR, member),
            (None, None) => self.name_query.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_mode() {
        let mut query = QueryState::new();
        query.update("Obj");

        assert_eq!(query.mode(), QueryMode::Name);
        assert_eq!(query.name_query(), "Obj");
        assert_eq!(query.member_query(), None);
        assert_eq!(query.menu_query(), None);
        assert_eq!(query.field_value(), "Obj");
    }

    #[test]
    fn test_enter_member_mode() {
        let mut query = QueryState::new();
        query.update("Object#wa");

        assert_eq!(query.mode(), QueryMode::Member);
        assert_eq!(query.name_query(), "Object");
        assert_eq!(query.member_query(), Some("wa"));
        assert_eq!(query.field_value(), "#wa");
    }

    #[test]
    fn test_member_mode_continues_from_field() {
        let mut query = QueryState::new();
        query.update("Object#");
        assert_eq!(query.member_query(), Some(""));
        assert_eq!(query.field_value(), "#");

        query.update("#wait");
        assert_eq!(query.name_query(), "Object");
        assert_eq!(query.member_query(), Some("wait"));

        // Deleting the separator from the field returns to the name search
        query.update("");
        assert_eq!(query.mode(), QueryMode::Name);
        assert_eq!(query.name_query(), "Object");
        assert_eq!(query.field_value(), "Object");
    }

    #[test]
    fn test_menu_via_member_mode() {
        let mut query = QueryState::new();
        query.update("Object#wait");
        query.update("#wait@");

        assert_eq!(query.mode(), QueryMode::Menu);
        assert_eq!(query.member_query(), Some("wait"));
        assert_eq!(query.menu_query(), Some(""));
        assert_eq!(query.field_value(), "@");

        query.update("@2");
        assert_eq!(query.menu_query(), Some("2"));
        assert_eq!(query.entire_query_string(), "Object#wait@2");

        // Leaving the menu keeps the member search
        query.update("2");
        assert_eq!(query.mode(), QueryMode::Member);
        assert_eq!(query.entire_query_string(), "Object#wait");
        assert_eq!(query.field_value(), "#wait");
    }

    #[test]
    fn test_menu_from_name_mode() {
        let mut query = QueryState::new();
        query.update("java.io@1");

        assert_eq!(query.mode(), QueryMode::Menu);
        assert_eq!(query.name_query(), "java.io");
        assert_eq!(query.member_query(), None);
        assert_eq!(query.menu_query(), Some("1"));
    }

    #[test]
    fn test_separators_split_on_first_occurrence() {
        let mut query = QueryState::new();
        query.update("a#b#c@d@e");

        assert_eq!(query.name_query(), "a");
        assert_eq!(query.member_query(), Some("b#c"));
        assert_eq!(query.menu_query(), Some("d@e"));
        assert_eq!(query.entire_query_string(), "a#b#c@d@e");
    }

    #[test]
    fn test_erase() {
        let mut query = QueryState::new();
        query.update("Object#wait@1");
        query.erase();

        assert_eq!(query, QueryState::new());
        assert_eq!(query.entire_query_string(), "");
    }

    #[test]
    fn test_erase_segment() {
        let mut query = QueryState::new();
        query.update("Object#wait@1");

        query.erase_segment();
        assert_eq!(query.entire_query_string(), "Object#wait");
        assert_eq!(query.field_value(), "#wait");

        query.erase_segment();
        assert_eq!(query.entire_query_string(), "Object");
        assert_eq!(query.field_value(), "Object");

        query.erase_segment();
        assert_eq!(query.entire_query_string(), "");
    }
}
