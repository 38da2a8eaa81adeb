//! Sign-in form view.

use mindmood_core::validation::Field;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::state::{FormPhase, FormState};

/// Outer size of the form card.
pub const CARD_WIDTH: u16 = 60;
pub const CARD_HEIGHT: u16 = 22;

const ACCENT: Color = Color::Cyan;
const ERROR: Color = Color::Red;
const MUTED: Color = Color::DarkGray;

const TERMS: &str = "By continuing, you agree to MindMood's Terms of Service and Privacy Policy";

/// Spinner frames for the submit button while a request is in flight.
const SPINNER_FRAMES: &[&str] = &["◐", "◓", "◑", "◒"];

/// Renders the form centered in `area`.
pub fn render_form(frame: &mut Frame, form: &FormState, spinner_frame: usize, area: Rect) {
    let card = centered(area, CARD_WIDTH, CARD_HEIGHT);
    frame.render_widget(Clear, card);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT))
        .title(" MindMood ")
        .title_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD));
    let inner = block.inner(card);
    frame.render_widget(block, card);

    let inner = Rect::new(
        inner.x + 1,
        inner.y,
        inner.width.saturating_sub(2),
        inner.height,
    );

    let rows = Layout::vertical([
        Constraint::Length(1), // title
        Constraint::Length(1), // subtitle
        Constraint::Length(1),
        Constraint::Length(3), // email
        Constraint::Length(1), // email error
        Constraint::Length(3), // password
        Constraint::Length(1), // password error
        Constraint::Length(1), // forgot password
        Constraint::Length(1), // form error / notice
        Constraint::Length(1), // submit
        Constraint::Length(1),
        Constraint::Length(1), // mode switch
        Constraint::Length(2), // terms
        Constraint::Min(0),
        Constraint::Length(1), // key hints
    ])
    .split(inner);

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            form.title(),
            Style::default().add_modifier(Modifier::BOLD),
        ))),
        rows[0],
    );
    frame.render_widget(
        Paragraph::new(Span::styled(form.subtitle(), Style::default().fg(MUTED))),
        rows[1],
    );

    render_field(frame, form, Field::Email, rows[3]);
    render_field_error(frame, form, Field::Email, rows[4]);
    render_field(frame, form, Field::Password, rows[5]);
    render_field_error(frame, form, Field::Password, rows[6]);

    if form.forgot_password_visible() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "Forgot password? (Ctrl+F)",
                Style::default().fg(ACCENT),
            ))
            .alignment(Alignment::Right),
            rows[7],
        );
    }

    if let Some(line) = message_line(form) {
        frame.render_widget(Paragraph::new(line), rows[8]);
    }

    frame.render_widget(
        Paragraph::new(submit_line(form, spinner_frame)).alignment(Alignment::Center),
        rows[9],
    );

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(form.switch_prompt(), Style::default().fg(MUTED)),
            Span::raw(" "),
            Span::styled(
                form.switch_action(),
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" (Ctrl+T)", Style::default().fg(MUTED)),
        ]))
        .alignment(Alignment::Center),
        rows[11],
    );

    frame.render_widget(
        Paragraph::new(Span::styled(TERMS, Style::default().fg(MUTED)))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        rows[12],
    );

    frame.render_widget(
        Paragraph::new(Span::styled(key_hints(form), Style::default().fg(MUTED)))
            .alignment(Alignment::Center),
        rows[14],
    );
}

fn render_field(frame: &mut Frame, form: &FormState, field: Field, area: Rect) {
    let focused = form.focus == field && form.phase == FormPhase::Idle;
    let border = if form.field_errors.get(field).is_some() {
        ERROR
    } else if focused {
        ACCENT
    } else {
        MUTED
    };

    let mut title = format!(" {} ", field.label());
    if field == Field::Password {
        let toggle = if form.password_visible {
            "hide"
        } else {
            "show"
        };
        title = format!(" {} (Ctrl+P {toggle}) ", field.label());
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(title);
    let text_area = block.inner(area);
    frame.render_widget(block, area);

    let value = match field {
        Field::Email => form.email.clone(),
        Field::Password => form.password_display(),
    };
    let width = usize::from(text_area.width.saturating_sub(1));
    let visible = visible_tail(&value, width);
    let visible_width = visible.width();

    let text_style = if form.submitting {
        Style::default().fg(MUTED)
    } else {
        Style::default()
    };
    frame.render_widget(Paragraph::new(Span::styled(visible, text_style)), text_area);

    if focused {
        let cursor_x = text_area.x + u16::try_from(visible_width).unwrap_or(text_area.width);
        frame.set_cursor_position((cursor_x, text_area.y));
    }
}

fn render_field_error(frame: &mut Frame, form: &FormState, field: Field, area: Rect) {
    if let Some(error) = form.field_errors.get(field) {
        frame.render_widget(
            Paragraph::new(Span::styled(
                error.message(field),
                Style::default().fg(ERROR),
            )),
            area,
        );
    }
}

fn message_line(form: &FormState) -> Option<Line<'static>> {
    if let Some(error) = &form.form_error {
        return Some(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(ERROR),
        )));
    }
    form.notice
        .as_ref()
        .map(|notice| Line::from(Span::styled(notice.clone(), Style::default().fg(Color::Green))))
}

fn submit_line(form: &FormState, spinner_frame: usize) -> Line<'static> {
    if form.submitting {
        let spinner = SPINNER_FRAMES[spinner_frame % SPINNER_FRAMES.len()];
        return Line::from(Span::styled(
            format!("{spinner} Please wait..."),
            Style::default().fg(Color::Yellow),
        ));
    }
    if form.phase == FormPhase::Done {
        return Line::from(Span::styled(
            "Signed in",
            Style::default().fg(Color::Green),
        ));
    }
    Line::from(Span::styled(
        format!("[ {} ]", form.submit_label()),
        Style::default()
            .fg(Color::Black)
            .bg(ACCENT)
            .add_modifier(Modifier::BOLD),
    ))
}

fn key_hints(form: &FormState) -> &'static str {
    if form.submitting {
        "Ctrl+C quit"
    } else {
        "Enter submit · Tab next field · Esc back"
    }
}

/// Keeps the trailing part of `text` that fits in `width` columns, so the
/// caret end stays visible.
fn visible_tail(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let mut used = 0;
    let mut tail: Vec<char> = Vec::new();
    for c in text.chars().rev() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        tail.push(c);
    }
    tail.into_iter().rev().collect()
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
