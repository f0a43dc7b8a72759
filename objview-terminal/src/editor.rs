/// Viewer state driven by key presses and prompt commands
use crate::document::{parse_index_list, parse_vector3, CommandError, CommandResult, Document};
use crate::settings::ViewerSettings;
use crossterm::event::KeyCode;
use objview_core::projection::multiply_matrix4_by_vector3;
use objview_core::transform::model_matrix;
use objview_core::vector::EPSILON;
use objview_core::{delete_polygons, delete_vertices, Axis, Camera, Vector3};

/// Which part of the active transform `+`/`-` adjusts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Translate,
    Rotate,
    Scale,
}

impl Tool {
    pub fn next(self) -> Self {
        match self {
            Tool::Translate => Tool::Rotate,
            Tool::Rotate => Tool::Scale,
            Tool::Scale => Tool::Translate,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Tool::Translate => "translate",
            Tool::Rotate => "rotate",
            Tool::Scale => "scale",
        }
    }
}

/// Result of a prompt command
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Message(String),
    Quit,
}

/// What the shell should do after a key press
#[derive(Debug, Clone, PartialEq)]
pub enum KeyAction {
    Handled,
    Ignored,
    Quit,
    OpenPrompt,
    Message(String),
}

/// `(x, y, z)` with two decimals
pub fn format_triple(v: Vector3) -> String {
    format!("({:.2}, {:.2}, {:.2})", v.x, v.y, v.z)
}

pub struct Editor {
    documents: Vec<Document>,
    active: Option<usize>,
    camera: Camera,
    settings: ViewerSettings,
    tool: Tool,
    axis: Axis,
}

impl Editor {
    pub fn new(documents: Vec<Document>, settings: ViewerSettings) -> Self {
        let active = if documents.is_empty() { None } else { Some(0) };
        let mut editor = Self {
            documents,
            active,
            camera: Camera::default(),
            settings,
            tool: Tool::Translate,
            axis: Axis::X,
        };
        editor.frame_documents();
        editor
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active_document(&self) -> Option<&Document> {
        self.active.and_then(|i| self.documents.get(i))
    }

    fn active_document_mut(&mut self) -> CommandResult<&mut Document> {
        self.active
            .and_then(|i| self.documents.get_mut(i))
            .ok_or(CommandError::NoDocument)
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn settings(&self) -> &ViewerSettings {
        &self.settings
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn select(&mut self, index: usize) -> bool {
        if index < self.documents.len() {
            self.active = Some(index);
            true
        } else {
            false
        }
    }

    pub fn toggle_visibility(&mut self) {
        if let Ok(doc) = self.active_document_mut() {
            doc.visible = !doc.visible;
        }
    }

    /// Pan the camera by whole steps along each axis
    pub fn move_camera(&mut self, steps: Vector3) {
        let delta = steps * self.settings.camera_step;
        self.camera.move_position(delta);
    }

    /// Aim the camera at the centre of every visible document, backing off
    /// along +Z until their transformed bounds fit the field of view
    pub fn frame_documents(&mut self) {
        let points: Vec<Vector3> = self
            .documents
            .iter()
            .filter(|doc| doc.visible)
            .flat_map(|doc| {
                let matrix = model_matrix(&doc.model.transform);
                doc.model
                    .vertices
                    .iter()
                    .map(move |&v| multiply_matrix4_by_vector3(&matrix, v))
            })
            .collect();
        let first = match points.first() {
            Some(&p) => p,
            None => return,
        };

        let (min, max) = points.iter().fold((first, first), |(lo, hi), p| {
            (
                Vector3::new(lo.x.min(p.x), lo.y.min(p.y), lo.z.min(p.z)),
                Vector3::new(hi.x.max(p.x), hi.y.max(p.y), hi.z.max(p.z)),
            )
        });
        let center = (min + max) * 0.5;
        let radius = points
            .iter()
            .map(|&p| (p - center).length())
            .fold(0.0, f64::max);
        let radius = if radius > EPSILON { radius } else { 1.0 };

        // narrow viewports are limited by the horizontal field of view
        let half_fov = ((self.camera.fov() * 0.5).tan() * self.camera.aspect().min(1.0)).atan();
        let distance = radius / half_fov.tan() + radius;
        self.camera = Camera::builder()
            .position(center + Vector3::new(0.0, 0.0, distance))
            .target(center)
            .fov(self.camera.fov())
            .aspect(self.camera.aspect())
            .build();
    }

    pub fn set_axis(&mut self, axis: Axis) {
        self.axis = axis;
    }

    pub fn cycle_tool(&mut self) {
        self.tool = self.tool.next();
    }

    /// Apply one step (`sign` = +1 or -1) of the current tool on the current axis
    pub fn nudge(&mut self, sign: f64) {
        let (tool, axis) = (self.tool, self.axis);
        let step = self.settings.step * sign;
        let min_scale = self.settings.min_scale;
        if let Ok(doc) = self.active_document_mut() {
            let transform = &mut doc.model.transform;
            match tool {
                Tool::Translate => transform.translate_by(axis, step),
                Tool::Rotate => transform.rotate_by(axis, step),
                Tool::Scale => transform.scale_by(axis, step, min_scale),
            }
        }
    }

    pub fn reset_active(&mut self) {
        if let Ok(doc) = self.active_document_mut() {
            doc.model.transform.reset();
        }
    }

    pub fn reset_all(&mut self) {
        for doc in &mut self.documents {
            doc.model.transform.reset();
        }
    }

    /// Translation, rotation and scale of the active document
    pub fn transform_summary(&self) -> Option<String> {
        self.active_document().map(|doc| {
            let t = doc.model.transform;
            format!(
                "T{} R{} S{}",
                format_triple(t.translation()),
                format_triple(t.rotation()),
                format_triple(t.scale())
            )
        })
    }

    /// Map a key press to an editor action
    pub fn handle_key(&mut self, code: KeyCode) -> KeyAction {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return KeyAction::Quit,
            KeyCode::Char(':') => return KeyAction::OpenPrompt,
            KeyCode::Up => self.move_camera(Vector3::new(0.0, 0.0, -1.0)),
            KeyCode::Down => self.move_camera(Vector3::new(0.0, 0.0, 1.0)),
            KeyCode::Left => self.move_camera(Vector3::new(1.0, 0.0, 0.0)),
            KeyCode::Right => self.move_camera(Vector3::new(-1.0, 0.0, 0.0)),
            KeyCode::Char('w') => self.move_camera(Vector3::new(0.0, 1.0, 0.0)),
            KeyCode::Char('s') => self.move_camera(Vector3::new(0.0, -1.0, 0.0)),
            KeyCode::Char('x') => self.set_axis(Axis::X),
            KeyCode::Char('y') => self.set_axis(Axis::Y),
            KeyCode::Char('z') => self.set_axis(Axis::Z),
            KeyCode::Char('m') => self.cycle_tool(),
            KeyCode::Char('+') | KeyCode::Char('=') => self.nudge(1.0),
            KeyCode::Char('-') => self.nudge(-1.0),
            KeyCode::Char('0') => self.reset_active(),
            KeyCode::Char('R') => self.reset_all(),
            KeyCode::Char('f') => self.frame_documents(),
            KeyCode::Char('v') => self.toggle_visibility(),
            KeyCode::Char(c @ '1'..='9') => {
                if !self.select(c as usize - '1' as usize) {
                    return KeyAction::Message(format!("no document {}", c));
                }
            }
            _ => return KeyAction::Ignored,
        }
        KeyAction::Handled
    }

    pub fn add_document(&mut self, document: Document) {
        self.documents.push(document);
        self.active = Some(self.documents.len() - 1);
    }

    pub fn close_active(&mut self) -> CommandResult<Document> {
        let index = self.active.ok_or(CommandError::NoDocument)?;
        let doc = self.documents.remove(index);
        self.active = match self.documents.len() {
            0 => None,
            len => Some(index.min(len - 1)),
        };
        Ok(doc)
    }

    /// Run one prompt command line
    pub fn execute(&mut self, line: &str) -> CommandResult<Outcome> {
        let line = line.trim();
        let (command, args) = match line.split_once(char::is_whitespace) {
            Some((command, args)) => (command, args.trim()),
            None => (line, ""),
        };

        let message = match command {
            "q" | "quit" => return Ok(Outcome::Quit),
            "dv" => {
                let positions = parse_index_list(args)?;
                let doc = self.active_document_mut()?;
                delete_vertices(&mut doc.model, &positions, true).to_string()
            }
            "dp" => {
                let positions = parse_index_list(args)?;
                let prune = self.settings.prune_on_polygon_delete;
                let doc = self.active_document_mut()?;
                delete_polygons(&mut doc.model, &positions, prune).to_string()
            }
            "t" => {
                let translation = parse_vector3("t", args)?;
                self.active_document_mut()?.model.transform.set_translation(translation);
                format!("translation {}", format_triple(translation))
            }
            "r" => {
                let rotation = parse_vector3("r", args)?;
                self.active_document_mut()?.model.transform.set_rotation(rotation);
                format!("rotation {}", format_triple(rotation))
            }
            "s" => {
                let min = self.settings.min_scale;
                let v = parse_vector3("s", args)?;
                let scale = Vector3::new(v.x.max(min), v.y.max(min), v.z.max(min));
                self.active_document_mut()?.model.transform.set_scale(scale);
                format!("scale {}", format_triple(scale))
            }
            "prune" => {
                self.settings.prune_on_polygon_delete = match args {
                    "on" => true,
                    "off" => false,
                    _ => {
                        return Err(CommandError::MissingArgument {
                            command: "prune",
                            argument: "`on` or `off`",
                        })
                    }
                };
                format!("prune {}", args)
            }
            "w" => {
                let doc = self.active_document_mut()?;
                let path = match (args, &doc.path) {
                    ("", Some(path)) => path.clone(),
                    ("", None) => {
                        return Err(CommandError::MissingArgument {
                            command: "w",
                            argument: "a path",
                        })
                    }
                    (path, _) => path.into(),
                };
                doc.save_as(&path)?;
                format!("saved {}", path.display())
            }
            "o" => {
                if args.is_empty() {
                    return Err(CommandError::MissingArgument {
                        command: "o",
                        argument: "a path",
                    });
                }
                let doc = Document::open(args)?;
                let message = format!("opened {}", doc.name);
                self.add_document(doc);
                message
            }
            "close" => format!("closed {}", self.close_active()?.name),
            "reset" => {
                if args == "all" {
                    self.reset_all();
                } else {
                    self.reset_active();
                }
                "transform reset".to_string()
            }
            "frame" => {
                self.frame_documents();
                "camera framed".to_string()
            }
            other => return Err(CommandError::Unknown(other.to_string())),
        };

        log::debug!("{} -> {}", line, message);
        Ok(Outcome::Message(message))
    }
}
