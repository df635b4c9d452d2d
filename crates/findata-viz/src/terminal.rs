//! 터미널 설정/복원과 이벤트 루프.

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::widgets::Widget;
use ratatui::Terminal;
use std::io::{self, Stdout};
use std::time::Duration;

/// 이벤트 대기 주기
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// 종료 키 여부 (`q`, `Esc`, `Ctrl+C`)
pub fn is_quit_key(key: &KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// 위젯을 전체 화면으로 표시하고 종료 키를 기다립니다.
///
/// `widget`은 매 프레임 호출되어 새 위젯을 만듭니다. 패닉이 나도 터미널을 복원합니다.
pub fn run_viewer<W, F>(widget: F) -> anyhow::Result<()>
where
    W: Widget,
    F: Fn() -> W,
{
    install_panic_hook();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.clear()?;

    let result = event_loop(&mut terminal, &widget);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn event_loop<W, F>(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    widget: &F,
) -> anyhow::Result<()>
where
    W: Widget,
    F: Fn() -> W,
{
    loop {
        terminal.draw(|frame| frame.render_widget(widget(), frame.area()))?;

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if is_quit_key(&key) {
                    return Ok(());
                }
            }
        }
    }
}

fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));
}
