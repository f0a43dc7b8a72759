/// Wavefront OBJ reader and writer
///
/// Only `v`, `vt`, `vn` and `f` records are interpreted; other keywords are
/// skipped. Face indices are 1-based, negative indices count back from the
/// end of the list read so far.
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use nom::{
    character::complete::{char, i64 as integer},
    combinator::{all_consuming, opt},
    number::complete::double,
    sequence::preceded,
    IResult,
};

use crate::error::{ObjError, ObjResult};
use crate::geometry::{Model, Polygon};
use crate::vector::{Vector2, Vector3};

/// Parse OBJ text into a model with an identity transform.
pub fn read_obj(content: &str) -> ObjResult<Model> {
    let mut model = Model::new();

    for (index, raw) in content.lines().enumerate() {
        let line = index + 1;
        let text = raw.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }

        let mut tokens = text.split_whitespace();
        let keyword = tokens.next().unwrap_or_default();
        let args: Vec<&str> = tokens.collect();

        match keyword {
            "v" => model.vertices.push(parse_vector3(&args, line, "vertex")?),
            "vt" => model.texture_vertices.push(parse_texture_vertex(&args, line)?),
            "vn" => model.normals.push(parse_vector3(&args, line, "normal")?),
            "f" => {
                let polygon = parse_face(&args, &model, line)?;
                model.polygons.push(polygon);
            }
            other => log::debug!("Ignoring `{}` on line {}", other, line),
        }
    }

    if model.vertices.is_empty() {
        return Err(ObjError::Invalid("model has no vertices".into()));
    }
    if model.polygons.is_empty() {
        return Err(ObjError::Invalid("model has no polygons".into()));
    }

    Ok(model)
}

/// Read and parse an OBJ file
pub fn load_obj<P: AsRef<Path>>(path: P) -> ObjResult<Model> {
    let path = path.as_ref();
    log::info!("Loading mesh: {}", path.display());
    let model = read_obj(&fs::read_to_string(path)?)?;
    log::info!(
        "Loaded {} vertices, {} polygons from {}",
        model.vertex_count(),
        model.polygon_count(),
        path.display()
    );
    Ok(model)
}

fn parse_float(token: &str, line: usize) -> ObjResult<f64> {
    all_consuming(double)(token)
        .map(|(_, value)| value)
        .map_err(|_: nom::Err<nom::error::Error<&str>>| {
            ObjError::parse(line, format!("invalid float value `{}`", token))
        })
}

fn parse_vector3(args: &[&str], line: usize, what: &str) -> ObjResult<Vector3> {
    if args.len() != 3 {
        return Err(ObjError::parse(
            line,
            format!("{} must have exactly 3 coordinates", what),
        ));
    }
    Ok(Vector3::new(
        parse_float(args[0], line)?,
        parse_float(args[1], line)?,
        parse_float(args[2], line)?,
    ))
}

fn parse_texture_vertex(args: &[&str], line: usize) -> ObjResult<Vector2> {
    if args.len() < 2 {
        return Err(ObjError::parse(
            line,
            "texture vertex must have at least 2 coordinates",
        ));
    }
    Ok(Vector2::new(parse_float(args[0], line)?, parse_float(args[1], line)?))
}

/// `v`, `v/vt`, `v//vn` or `v/vt/vn`
type FaceEntry = (i64, Option<i64>, Option<i64>);

fn face_entry(input: &str) -> IResult<&str, FaceEntry> {
    let (input, vertex) = integer(input)?;
    let (input, texture) = opt(preceded(char('/'), opt(integer)))(input)?;
    let (input, normal) = match texture {
        Some(_) => opt(preceded(char('/'), opt(integer)))(input)?,
        None => (input, None),
    };
    Ok((input, (vertex, texture.flatten(), normal.flatten())))
}

fn resolve_index(value: i64, len: usize, line: usize) -> ObjResult<usize> {
    if value == 0 {
        return Err(ObjError::parse(line, "OBJ indices start from 1"));
    }
    let resolved = if value > 0 {
        value - 1
    } else {
        len as i64 + value
    };
    if resolved < 0 || resolved >= len as i64 {
        return Err(ObjError::parse(line, format!("index {} out of bounds", value)));
    }
    Ok(resolved as usize)
}

fn parse_face(args: &[&str], model: &Model, line: usize) -> ObjResult<Polygon> {
    if args.len() < 3 {
        return Err(ObjError::parse(line, "polygon must have at least 3 vertices"));
    }

    let mut vertices = Vec::with_capacity(args.len());
    let mut textures = Vec::new();
    let mut normals = Vec::new();

    for &token in args {
        let (_, (v, vt, vn)) = all_consuming(face_entry)(token)
            .map_err(|_| ObjError::parse(line, format!("invalid face entry `{}`", token)))?;

        vertices.push(resolve_index(v, model.vertices.len(), line)?);
        if let Some(vt) = vt {
            textures.push(resolve_index(vt, model.texture_vertices.len(), line)?);
        }
        if let Some(vn) = vn {
            normals.push(resolve_index(vn, model.normals.len(), line)?);
        }
    }

    if !textures.is_empty() && textures.len() != vertices.len() {
        return Err(ObjError::parse(line, "polygon has incomplete texture coordinates"));
    }
    if !normals.is_empty() && normals.len() != vertices.len() {
        return Err(ObjError::parse(line, "polygon has incomplete normals"));
    }

    Polygon::with_attributes(vertices, textures, normals).map_err(|e| ObjError::parse(line, e.to_string()))
}

/// Serialize `model` as OBJ text. The model is validated first.
pub fn write_obj<W: Write>(model: &Model, writer: &mut W) -> ObjResult<()> {
    model.validate()?;

    writeln!(writer, "# Created by objview")?;
    writeln!(writer, "# Vertices: {}", model.vertices.len())?;
    writeln!(writer, "# Texture coordinates: {}", model.texture_vertices.len())?;
    writeln!(writer, "# Normals: {}", model.normals.len())?;
    writeln!(writer, "# Polygons: {}", model.polygons.len())?;
    writeln!(writer)?;

    for v in &model.vertices {
        writeln!(writer, "v {:.6} {:.6} {:.6}", v.x, v.y, v.z)?;
    }
    if !model.vertices.is_empty() {
        writeln!(writer)?;
    }

    for vt in &model.texture_vertices {
        writeln!(writer, "vt {:.6} {:.6}", vt.x, vt.y)?;
    }
    if !model.texture_vertices.is_empty() {
        writeln!(writer)?;
    }

    for vn in &model.normals {
        writeln!(writer, "vn {:.6} {:.6} {:.6}", vn.x, vn.y, vn.z)?;
    }
    if !model.normals.is_empty() {
        writeln!(writer)?;
    }

    for polygon in &model.polygons {
        writeln!(writer, "{}", face_record(polygon))?;
    }

    Ok(())
}

fn face_record(polygon: &Polygon) -> String {
    let mut record = String::from("f");
    for (i, v) in polygon.vertex_indices().iter().enumerate() {
        let vt = polygon.texture_indices().get(i);
        let vn = polygon.normal_indices().get(i);
        let entry = match (vt, vn) {
            (Some(t), Some(n)) => format!(" {}/{}/{}", v + 1, t + 1, n + 1),
            (Some(t), None) => format!(" {}/{}", v + 1, t + 1),
            (None, Some(n)) => format!(" {}//{}", v + 1, n + 1),
            (None, None) => format!(" {}", v + 1),
        };
        record.push_str(&entry);
    }
    record
}

pub fn to_obj_string(model: &Model) -> ObjResult<String> {
    let mut buffer = Vec::new();
    write_obj(model, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Validate and write `model` to `path`
pub fn save_obj<P: AsRef<Path>>(model: &Model, path: P) -> ObjResult<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    write_obj(model, &mut writer)?;
    writer.flush()?;
    log::info!("Saved {} polygons to {}", model.polygon_count(), path.display());
    Ok(())
}
