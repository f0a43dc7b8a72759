/// Terminal wireframe viewer and editor for OBJ models
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use objview_core::render::render_model;
use objview_core::Surface;
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod document;
pub mod editor;
pub mod renderer;
pub mod settings;

pub use document::{parse_index_list, parse_vector3, CommandError, Document};
pub use editor::{Editor, KeyAction, Outcome, Tool};
pub use renderer::AsciiRenderer;
pub use settings::ViewerSettings;

enum Mode {
    Normal,
    Command(String),
}

/// Main application struct for the terminal viewer
pub struct TerminalApp {
    editor: Editor,
    renderer: AsciiRenderer,
    mode: Mode,
    status: String,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(documents: Vec<Document>, settings: ViewerSettings) -> io::Result<Self> {
        let (width, height) = terminal::size()?;

        Ok(Self {
            editor: Editor::new(documents, settings),
            renderer: AsciiRenderer::new(width as usize, height as usize),
            mode: Mode::Normal,
            status: String::from("press : for commands, q to quit"),
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / self.editor.settings().frame_rate.max(1));

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            self.render()?;

            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => match &mut self.mode {
                Mode::Normal => self.handle_key(code),
                Mode::Command(buffer) => match code {
                    KeyCode::Esc => self.mode = Mode::Normal,
                    KeyCode::Backspace => {
                        buffer.pop();
                    }
                    KeyCode::Char(c) => buffer.push(c),
                    KeyCode::Enter => {
                        let line = std::mem::take(buffer);
                        self.mode = Mode::Normal;
                        self.run_command(&line);
                    }
                    _ => {}
                },
            },
            Event::Resize(width, height) => {
                self.renderer = AsciiRenderer::new(width as usize, height as usize);
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, code: KeyCode) {
        match self.editor.handle_key(code) {
            KeyAction::Quit => self.running = false,
            KeyAction::OpenPrompt => self.mode = Mode::Command(String::new()),
            KeyAction::Message(message) => self.status = message,
            KeyAction::Handled | KeyAction::Ignored => {}
        }
    }

    fn run_command(&mut self, line: &str) {
        match self.editor.execute(line) {
            Ok(Outcome::Quit) => self.running = false,
            Ok(Outcome::Message(message)) => self.status = message,
            Err(e) => {
                log::warn!("command `{}` failed: {}", line, e);
                self.status = format!("error: {}", e);
            }
        }
    }

    fn render(&mut self) -> io::Result<()> {
        let (width, height) = (self.renderer.width(), self.renderer.height());
        let aspect = self.editor.settings().aspect_ratio(width, height);
        self.editor.camera_mut().set_aspect_ratio(aspect);

        self.renderer.clear();

        let active = self.editor.active_index();
        let mut failure = None;
        for (i, doc) in self.editor.documents().iter().enumerate() {
            if !doc.visible {
                continue;
            }
            self.renderer
                .set_pen(if Some(i) == active { Color::Cyan } else { Color::DarkGrey });
            if let Err(e) = render_model(
                &mut self.renderer,
                self.editor.camera(),
                &doc.model,
                width as u32,
                height as u32,
            ) {
                failure = Some(e);
            }
        }
        if let Some(e) = failure {
            self.status = format!("error: {}", e);
        }

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        self.renderer.draw(&mut stdout)?;

        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(self.title()),
            ResetColor
        )?;

        if height > 1 {
            let bottom = (height - 1) as u16;
            let line = match &self.mode {
                Mode::Normal => self.status.clone(),
                Mode::Command(buffer) => format!(":{}", buffer),
            };
            queue!(
                stdout,
                cursor::MoveTo(0, bottom),
                terminal::Clear(ClearType::CurrentLine),
                Print(line)
            )?;
        }

        stdout.flush()?;
        Ok(())
    }

    fn title(&self) -> String {
        let document = match self.editor.active_document() {
            Some(doc) => format!(
                "{} [{}v {}p] {}",
                doc.name,
                doc.model.vertex_count(),
                doc.model.polygon_count(),
                self.editor.transform_summary().unwrap_or_default()
            ),
            None => String::from("no document"),
        };
        format!(
            "objview | FPS: {:.1} | {} | {} {:?} | arrows/w/s=camera x/y/z m +/- :t/:r/:s",
            self.fps,
            document,
            self.editor.tool().name(),
            self.editor.axis(),
        )
    }
}
