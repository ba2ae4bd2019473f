use serde::Serialize;

use crate::models::{SeatPlan, Section};
use super::normalizer::group_key;

/// Порядок групп на схеме по первой букве: партер, мезонин, бельэтаж, балкон.
const GROUP_ORDER: [char; 4] = ['O', 'M', 'D', 'B'];

/// Запас вокруг секции при расчете размера контейнера.
pub const SECTION_PADDING: f64 = 10.0;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionGroup<'a> {
    pub name: String,
    pub sections: Vec<&'a Section>,
}

fn group_rank(name: &str) -> usize {
    name.chars()
        .next()
        .and_then(|first| GROUP_ORDER.iter().position(|c| *c == first))
        .unwrap_or(GROUP_ORDER.len())
}

/// Группы секций в порядке отображения. Неизвестные группы идут
/// последними в порядке первого появления.
pub fn group_sections(plan: &SeatPlan) -> Vec<SectionGroup<'_>> {
    let mut groups: Vec<SectionGroup<'_>> = Vec::new();

    for section in &plan.sections {
        let key = group_key(section);
        match groups.iter_mut().find(|g| g.name == key) {
            Some(group) => group.sections.push(section),
            None => groups.push(SectionGroup { name: key.to_string(), sections: vec![section] }),
        }
    }

    // sort_by_key стабильный
    groups.sort_by_key(|g| group_rank(&g.name));
    groups
}

/// Размер контейнера секции: максимум координат плюс запас.
pub fn section_extent(section: &Section) -> Option<(f64, f64)> {
    let max_x = section.seats().filter_map(|s| s.x).reduce(f64::max)?;
    let max_y = section.seats().filter_map(|s| s.y).reduce(f64::max)?;
    Some((max_x + SECTION_PADDING, max_y + SECTION_PADDING))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Row, Seat, Theater};

    fn section(id: i64, parent: Option<&str>, coords: &[(f64, f64)]) -> Section {
        Section {
            id,
            name: format!("S{}", id),
            label: format!("S{}", id),
            category_key: None,
            color: None,
            parent_section: parent.map(str::to_string),
            rows: vec![Row {
                id,
                label: "A".into(),
                display_label: None,
                section_id: id,
                seats: coords
                    .iter()
                    .enumerate()
                    .map(|(i, &(x, y))| Seat {
                        id: i as i64,
                        seat_number: i.to_string(),
                        display_number: None,
                        price: None,
                        status: None,
                        accessible: None,
                        x: Some(x),
                        y: Some(y),
                        attributes: None,
                    })
                    .collect(),
            }],
        }
    }

    #[test]
    fn groups_follow_display_order() {
        let plan = SeatPlan {
            theater: Theater { id: 1, name: "T".into(), venue_slug: None },
            sections: vec![
                section(1, Some("BALCONY"), &[]),
                section(2, Some("LOGE"), &[]),
                section(3, Some("MEZZANINE"), &[]),
                section(4, Some("ORCHESTRA"), &[]),
                section(5, Some("MEZZANINE"), &[]),
                section(6, Some("ANNEX"), &[]),
            ],
        };

        let groups = group_sections(&plan);
        let names: Vec<_> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["ORCHESTRA", "MEZZANINE", "BALCONY", "LOGE", "ANNEX"]);
        assert_eq!(groups[1].sections.iter().map(|s| s.id).collect::<Vec<_>>(), vec![3, 5]);
    }

    #[test]
    fn sections_without_parent_form_main_group() {
        let plan = SeatPlan {
            theater: Theater { id: 1, name: "T".into(), venue_slug: None },
            sections: vec![section(1, None, &[]), section(2, None, &[])],
        };
        let groups = group_sections(&plan);
        assert_eq!(groups.len(), 1);
        // "Main" начинается с M и встает на место мезонина
        assert_eq!(groups[0].name, "Main");
        assert_eq!(groups[0].sections.len(), 2);
    }

    #[test]
    fn extent_pads_max_coordinates() {
        let s = section(1, None, &[(10.0, 15.0), (42.0, 30.0)]);
        assert_eq!(section_extent(&s), Some((52.0, 40.0)));
        assert_eq!(section_extent(&section(2, None, &[])), None);
    }
}
