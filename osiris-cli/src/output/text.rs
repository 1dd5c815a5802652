//! Text output formatting with tables and colors.

use osiris_core::{
    ActivityKind, Course, CourseInfo, CourseTests, Exam, Grade, ScheduleWeek, SearchResponse,
};
use std::fmt::Display;

use super::table::{Border, Cell, Table};

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const BLUE: &str = "\x1b[34m";
const MAGENTA: &str = "\x1b[35m";
const CYAN: &str = "\x1b[36m";
const BRIGHT_BLUE: &str = "\x1b[94m";
const ON_GREEN: &str = "\x1b[42m";
const ON_BLUE: &str = "\x1b[44m";

const DAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Text styles used in tables and messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// Bold.
    Bold,
    /// Dimmed.
    Dim,
    /// Red text.
    Red,
    /// Green text.
    Green,
    /// Yellow text.
    Yellow,
    /// Blue text.
    Blue,
    /// Magenta text.
    Magenta,
    /// Cyan text.
    Cyan,
    /// Bright blue text.
    BrightBlue,
    /// Green background.
    OnGreen,
    /// Blue background.
    OnBlue,
}

impl Style {
    fn code(self) -> &'static str {
        match self {
            Self::Bold => BOLD,
            Self::Dim => DIM,
            Self::Red => RED,
            Self::Green => GREEN,
            Self::Yellow => YELLOW,
            Self::Blue => BLUE,
            Self::Magenta => MAGENTA,
            Self::Cyan => CYAN,
            Self::BrightBlue => BRIGHT_BLUE,
            Self::OnGreen => ON_GREEN,
            Self::OnBlue => ON_BLUE,
        }
    }

    /// Color of a timetable subject.
    pub fn for_activity(kind: &ActivityKind) -> Option<Self> {
        match kind {
            ActivityKind::Lecture | ActivityKind::Presentation => Some(Self::Green),
            ActivityKind::Tutorial => Some(Self::Blue),
            ActivityKind::ExamReview => Some(Self::Yellow),
            ActivityKind::Exam | ActivityKind::Deadline => Some(Self::Red),
            ActivityKind::ComputerLab => Some(Self::Cyan),
            ActivityKind::Lab => Some(Self::Magenta),
            ActivityKind::Response => Some(Self::BrightBlue),
            ActivityKind::Other(_) => None,
        }
    }
}

// ============================================================================
// Formatter
// ============================================================================

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Applies `style` when colors are on.
    pub fn paint(&self, style: Style, text: &str) -> String {
        if self.use_colors {
            format!("{}{text}{RESET}", style.code())
        } else {
            text.to_string()
        }
    }

    /// Renders a table with this formatter's colors.
    pub fn table(&self, table: &Table) -> String {
        table.render(|style, text| self.paint(style, text))
    }

    /// Green success message.
    pub fn success(&self, text: &str) -> String {
        self.paint(Style::Green, text)
    }

    /// Red failure message.
    pub fn failure(&self, text: &str) -> String {
        self.paint(Style::Red, text)
    }

    /// Dimmed note.
    pub fn note(&self, text: &str) -> String {
        self.paint(Style::Dim, text)
    }

    // ========================================================================
    // Results
    // ========================================================================

    /// Formats grades; the result is green when sufficient, else red.
    pub fn grades(&self, grades: &[Grade]) -> String {
        let mut table = Table::new([
            "cursus",
            "cursus_korte_naam",
            "collegejaar",
            "blok",
            "weging",
            "resultaat",
        ]);
        for grade in grades {
            let style = if grade.is_passed() { Style::Green } else { Style::Red };
            table.push(vec![
                Cell::plain(grade.course_code.as_str()),
                Cell::plain(grade.course_name.as_str()),
                Cell::plain(opt(grade.academic_year.as_ref())),
                Cell::plain(opt(grade.block.as_ref())),
                Cell::plain(opt(grade.weight.as_ref())),
                Cell::styled(opt(grade.result.as_ref()), style),
            ]);
        }
        self.table(&table)
    }

    /// Formats the timetable.
    ///
    /// The week label is shown on the first row of each week and the day
    /// label on the first row of each day. Empty days have no rows.
    pub fn schedule(&self, weeks: &[ScheduleWeek]) -> String {
        let mut table = Table::new(Vec::<String>::new());
        for week in weeks {
            let mut first_of_week = true;
            for (day_idx, day) in week.days.iter().enumerate() {
                let day_name = DAYS
                    .get(day_idx)
                    .map(|d| (*d).to_string())
                    .or_else(|| day.date.clone())
                    .unwrap_or_default();

                for (entry_idx, entry) in day.entries.iter().enumerate() {
                    let week_cell = if first_of_week {
                        first_of_week = false;
                        Cell::styled(week_label(week), Style::OnBlue)
                    } else {
                        Cell::default()
                    };
                    let day_cell = if entry_idx == 0 {
                        Cell::styled(day_name.as_str(), Style::OnGreen)
                    } else {
                        Cell::default()
                    };
                    let subject = match Style::for_activity(&entry.activity()) {
                        Some(style) => Cell::styled(entry.title(), style),
                        None => Cell::plain(entry.title()),
                    };
                    table.push(vec![
                        week_cell,
                        day_cell,
                        subject,
                        Cell::plain(opt(entry.starts_at.as_ref())),
                        Cell::plain(opt(entry.ends_at.as_ref())),
                        Cell::plain(opt(entry.location.as_ref())),
                    ]);
                }
            }
        }
        if table.is_empty() {
            return "No activities scheduled".to_string();
        }
        self.table(&table)
    }

    // ========================================================================
    // Registrations
    // ========================================================================

    /// Formats registered courses; 6 EC rows are green, others blue.
    pub fn courses(&self, courses: &[Course]) -> String {
        let mut table = Table::new([
            "collegejaar",
            "blok",
            "id_cursus",
            "cursus",
            "cursus_korte_naam",
            "ec",
        ]);
        for course in courses {
            let style = if course.is_full_course() { Style::Green } else { Style::Blue };
            table.push_styled(
                [
                    opt(course.academic_year.as_ref()),
                    opt(course.block.as_ref()),
                    opt(course.course_id.as_ref()),
                    course.course_code.clone(),
                    course.course_name.clone(),
                    credits(course.credits),
                ],
                style,
            );
        }
        self.table(&table)
    }

    /// Formats registered exams; first attempts are green, others yellow.
    pub fn exams(&self, exams: &[Exam]) -> String {
        let mut table = Table::new([
            "collegejaar",
            "blok",
            "id_cursus",
            "cursus",
            "cursus_korte_naam",
            "id_toets_gelegenheid",
            "omschrijving",
            "gelegenheid",
            "toetsdatum",
            "dag",
        ]);
        for exam in exams {
            let style = if exam.is_first_attempt() { Style::Green } else { Style::Yellow };
            table.push_styled(
                [
                    opt(exam.academic_year.as_ref()),
                    opt(exam.block.as_ref()),
                    opt(exam.course_id.as_ref()),
                    exam.course_code.clone(),
                    exam.course_name.clone(),
                    opt(exam.occasion_id.as_ref()),
                    opt(exam.description.as_ref()),
                    opt(exam.attempt.as_ref()),
                    opt(exam.date.as_ref()),
                    opt(exam.day.as_ref()),
                ],
                style,
            );
        }
        self.table(&table)
    }

    /// Formats course search hits under a hit count.
    pub fn search(&self, response: &SearchResponse) -> String {
        let mut table = Table::new([
            "id_cursus_blok",
            "id_cursus",
            "collegejaar",
            "blok",
            "cursus",
            "cursus_korte_naam",
            "punten",
            "registration open",
        ]);
        for hit in &response.hits.hits {
            let course = &hit.source;
            let open = course.registration_open();
            let open_style = if open { Style::Green } else { Style::Red };
            table.push(vec![
                Cell::plain(opt(course.course_block_id.as_ref())),
                Cell::plain(opt(course.course_id.as_ref())),
                Cell::plain(opt(course.academic_year.as_ref())),
                Cell::plain(opt(course.block.as_ref())),
                Cell::plain(course.course_code.as_str()),
                Cell::plain(course.course_name.as_str()),
                Cell::plain(credits(course.credits)),
                Cell::styled(open.to_string(), open_style),
            ]);
        }
        format!(
            "{} hit(s) found\n{}",
            response.hits.total.count(),
            self.table(&table)
        )
    }

    /// Summary shown before a course registration is confirmed.
    pub fn course_summary(&self, info: &CourseInfo) -> String {
        let summary = [
            "collegejaar",
            "blok",
            "cursus",
            "cursus_korte_naam",
            "categorie_omschrijving",
            "punten",
        ]
        .iter()
        .map(|field| info.field(field))
        .collect::<Vec<_>>()
        .join("\t");

        let mut study = Table::new(["Study types", ""]).border(Border::Plain);
        for (code, description) in info.study_types() {
            study.push([code, description]);
        }
        let mut tests = Table::new(["Test types", ""]).border(Border::Plain);
        for (code, description) in info.test_types() {
            tests.push([code, description]);
        }

        format!(
            "{}\n\n{}\n\n{}",
            self.paint(Style::Bold, &summary),
            self.table(&study),
            self.table(&tests)
        )
    }

    /// Summary and test occasions shown before a test registration.
    pub fn course_tests(&self, course: &CourseTests) -> String {
        let summary = [
            opt(course.academic_year.as_ref()),
            course.course_code.clone(),
            course.course_name.clone(),
        ]
        .join("\t");

        let fields = [
            "id_toets_gelegenheid",
            "toets_omschrijving",
            "gelegenheid",
            "toetsdatum",
            "dag",
        ];
        let mut table = Table::new(fields).border(Border::Plain);
        for test in &course.tests {
            table.push(fields.iter().map(|f| test.field(f)));
        }

        format!("{}\n\n{}", self.paint(Style::Bold, &summary), self.table(&table))
    }
}

// ============================================================================
// Cell helpers
// ============================================================================

fn opt<T: Display>(value: Option<&T>) -> String {
    value.map(ToString::to_string).unwrap_or_default()
}

/// Credits without a trailing `.0`.
fn credits(value: Option<f64>) -> String {
    match value {
        Some(ec) if ec.fract().abs() < f64::EPSILON => format!("{ec:.0}"),
        Some(ec) => ec.to_string(),
        None => String::new(),
    }
}

fn week_label(week: &ScheduleWeek) -> String {
    match week.week {
        Some(n) => format!("Week {n}"),
        None => "Week".to_string(),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paint_respects_no_color() {
        assert_eq!(TextFormatter::new(false).paint(Style::Red, "x"), "x");
        assert_eq!(TextFormatter::new(true).paint(Style::Red, "x"), "\x1b[31mx\x1b[0m");
    }

    #[test]
    fn test_credits() {
        assert_eq!(credits(Some(6.0)), "6");
        assert_eq!(credits(Some(2.5)), "2.5");
        assert_eq!(credits(None), "");
    }

    #[test]
    fn test_activity_colors() {
        assert_eq!(Style::for_activity(&ActivityKind::Lecture), Some(Style::Green));
        assert_eq!(Style::for_activity(&ActivityKind::Response), Some(Style::BrightBlue));
        assert_eq!(Style::for_activity(&ActivityKind::from_code("WRK")), None);
    }
}
