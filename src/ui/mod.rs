pub mod canvas;

use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::App;

pub use canvas::BrailleCanvas;

pub fn render(frame: &mut Frame, app: &mut App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Rgb(100, 200, 255)))
        .title(" Asteroids ")
        .title_style(Style::default().fg(Color::Rgb(130, 220, 255)).add_modifier(Modifier::BOLD));

    let area = frame.area();
    let inner = block.inner(area);
    frame.render_widget(block, area);

    app.canvas.resize(inner.width as usize, inner.height as usize);
    app.draw();
    frame.render_widget(Paragraph::new(app.canvas.lines()), inner);
}
