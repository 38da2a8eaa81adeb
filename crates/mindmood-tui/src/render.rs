//! Pure view/render functions for the TUI.
//!
//! Functions here take `&AppState`, draw to a ratatui `Frame`, and never
//! mutate state or return effects.

use ratatui::Frame;
use ratatui::layout::Alignment;
use ratatui::style::{Color, Style};
use ratatui::text::Span;
use ratatui::widgets::{Paragraph, Wrap};

use crate::signin::{self, CARD_HEIGHT, CARD_WIDTH};
use crate::state::AppState;

/// Renders the entire TUI to the frame.
pub fn render(app: &AppState, frame: &mut Frame) {
    let area = frame.area();

    if area.width < CARD_WIDTH || area.height < CARD_HEIGHT {
        let message = format!(
            "Terminal too small ({}x{}). Need at least {CARD_WIDTH}x{CARD_HEIGHT}.",
            area.width, area.height
        );
        frame.render_widget(
            Paragraph::new(Span::styled(message, Style::default().fg(Color::Yellow)))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            area,
        );
        return;
    }

    signin::render_form(frame, &app.form, app.spinner_frame, area);
}
