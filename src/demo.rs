//! Sample section data for the terminal shell.

use crate::store::View;
use crate::virtual_list::{Item, Section};
use fake::faker::lorem::en::Words;
use fake::Fake;

fn title(min_words: usize, max_words: usize) -> String {
    let words: Vec<String> = Words(min_words..max_words + 1).fake();
    let mut title = words.join(" ");
    if let Some(first) = title.get(..1).map(str::to_uppercase) {
        title.replace_range(..1, &first);
    }
    title
}

/// Build `sections` sections of `items` items each for `view`. Skills are a
/// chain: each hack requires the one before it. Library items are open.
///
pub fn sample_sections(view: View, sections: usize, items: usize) -> Vec<Section> {
    (0..sections)
        .map(|s| {
            let section_id = format!("{}-{}", view.as_str(), s + 1);
            let items = (0..items)
                .map(|i| {
                    let id = format!("{}-{}", section_id, i + 1);
                    let prerequisites = match view {
                        View::Skills if i > 0 => vec![format!("{}-{}", section_id, i)],
                        _ => vec![],
                    };
                    Item {
                        is_unlocked: prerequisites.is_empty(),
                        id,
                        name: title(2, 4),
                        position: i as i32,
                        prerequisites,
                    }
                })
                .collect();
            let name = match view {
                View::Skills => format!("Level {}: {}", s + 1, title(1, 2)),
                View::Library => title(1, 3),
            };
            Section {
                id: section_id,
                name,
                items,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skills_chain_prerequisites() {
        let sections = sample_sections(View::Skills, 2, 3);
        assert_eq!(sections.len(), 2);
        let items = &sections[1].items;
        assert_eq!(items[0].id, "skills-2-1");
        assert!(items[0].prerequisites.is_empty());
        assert!(items[0].is_unlocked);
        assert_eq!(items[2].prerequisites, vec!["skills-2-2".to_string()]);
        assert!(!items[2].is_unlocked);
        assert!(sections[0].name.starts_with("Level 1: "));
    }

    #[test]
    fn test_library_items_are_open() {
        let sections = sample_sections(View::Library, 3, 4);
        assert!(sections
            .iter()
            .flat_map(|s| s.items.iter())
            .all(|i| i.prerequisites.is_empty() && i.is_unlocked));
        assert!(sections.iter().all(|s| !s.name.is_empty()));
    }
}
