use crate::{Graph, VertexId};
use anyhow::{bail, ensure, Context, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

impl Graph {
    /// Reads a graph in METIS format. Vertices are labelled `1..=n`.
    ///
    /// The header is `n m [fmt]`. If `fmt` ends in `1`, every neighbour on a vertex line is
    /// followed by the weight of the edge, otherwise all edges have weight 1.
    pub fn deserialize_metis<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("could not open {}", path.display()))?;
        Self::read_metis(BufReader::new(file))
    }

    pub fn read_metis<R: BufRead>(reader: R) -> Result<Self> {
        let mut lines = reader
            .lines()
            .filter(|l| !matches!(l, Ok(l) if l.starts_with('%') || l.starts_with('#')));

        // Parse the header line
        let header = lines.next().context("could not get header line")??;
        let header_parts = header.split_ascii_whitespace().collect::<Vec<_>>();
        let vertex_count = header_parts
            .first()
            .context("missing vertex count")?
            .parse::<usize>()
            .context("could not parse vertex count")?;
        let edge_count = header_parts
            .get(1)
            .context("missing edge count")?
            .parse::<usize>()
            .context("could not parse edge count")?;
        let weighted = header_parts.get(2).is_some_and(|fmt| fmt.ends_with('1'));

        let mut graph = Graph::with_capacity(vertex_count);
        for i in 1..=vertex_count {
            graph.add_vertex(i.to_string());
        }

        // Parse the edges
        let mut src = 0;
        for line in lines {
            let line = line?;
            ensure!(src < vertex_count, "more vertex lines than the {vertex_count} announced");

            let parts: Vec<&str> = line.split_ascii_whitespace().collect();
            let step = if weighted { 2 } else { 1 };
            ensure!(
                parts.len() % step == 0,
                "line {}: neighbour without weight",
                src + 1
            );
            for chunk in parts.chunks(step) {
                let dst = chunk[0]
                    .parse::<usize>()
                    .with_context(|| format!("line {}: could not parse neighbour", src + 1))?;
                ensure!(
                    (1..=vertex_count).contains(&dst),
                    "line {}: neighbour {dst} out of range",
                    src + 1
                );
                let weight = match chunk.get(1) {
                    Some(w) => w
                        .parse::<u32>()
                        .with_context(|| format!("line {}: could not parse weight", src + 1))?,
                    None => 1,
                };
                let (u, v) = (src as VertexId, (dst - 1) as VertexId);
                // each edge is listed on both endpoints, keep the first occurrence
                if u < v {
                    graph.add_edge(u, v, weight)?;
                } else if graph.find_edge(u, v).is_none() {
                    bail!("line {}: edge to {dst} is missing its reverse", src + 1);
                }
            }
            src += 1;
        }

        ensure!(
            src == vertex_count,
            "header announced {vertex_count} vertices, found {src} vertex lines"
        );
        ensure!(
            graph.edge_count() == edge_count,
            "header announced {edge_count} edges, found {}",
            graph.edge_count()
        );
        Ok(graph)
    }

    pub fn from_labelled_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("could not open {}", path.display()))?;
        Self::read_labelled(file)
    }

    /// Reads the two line text format
    ///
    /// ```text
    /// vertices: A B C D
    /// edges: AB(1) AC(3) BD(2) CD(4)
    /// ```
    ///
    /// Every upper case letter on the first line is a vertex, every `XY(w)` on the second line is
    /// an edge between `X` and `Y` of weight `w`.
    pub fn read_labelled<R: Read>(mut reader: R) -> Result<Self> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());

        let vertices = lines
            .next()
            .and_then(|l| l.strip_prefix("vertices:"))
            .context("expected a line starting with 'vertices:'")?;
        let mut graph = Graph::new();
        let mut names = HashMap::new();
        for c in vertices.chars().filter(char::is_ascii_uppercase) {
            ensure!(!names.contains_key(&c), "vertex {c} is listed twice");
            names.insert(c, graph.add_vertex(c));
        }

        let edges = match lines.next() {
            Some(l) => l
                .strip_prefix("edges:")
                .context("expected a line starting with 'edges:'")?,
            None => return Ok(graph),
        };
        for token in edges.split(|c: char| c.is_whitespace() || c == ',').filter(|t| !t.is_empty()) {
            let (u, v, weight) =
                parse_labelled_edge(token).with_context(|| format!("invalid edge '{token}'"))?;
            let u = *names.get(&u).with_context(|| format!("unknown vertex {u}"))?;
            let v = *names.get(&v).with_context(|| format!("unknown vertex {v}"))?;
            graph.add_edge(u, v, weight)?;
        }
        Ok(graph)
    }
}

/// Parses `XY(w)`.
fn parse_labelled_edge(token: &str) -> Result<(char, char, u32)> {
    let mut chars = token.chars();
    let (Some(u), Some(v), Some('(')) = (chars.next(), chars.next(), chars.next()) else {
        bail!("expected the form XY(weight)");
    };
    ensure!(
        u.is_ascii_uppercase() && v.is_ascii_uppercase(),
        "vertex names must be upper case letters"
    );
    let weight = chars
        .as_str()
        .strip_suffix(')')
        .context("missing closing parenthesis")?
        .parse()
        .context("could not parse weight")?;
    Ok((u, v, weight))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labelled_format() {
        let text = "\n\nvertices: A B C D\nedges: AB(1) AC(3) BD(2) CD(4) AD(0) BC(0)\n";
        let graph = Graph::read_labelled(text.as_bytes()).unwrap();
        assert_eq!(graph.vertex_count(), 4);
        assert_eq!(graph.edge_count(), 6);
        assert_eq!(graph.label(2), "C");
        assert_eq!(graph.find_edge(2, 3), Some(4));
        assert_eq!(graph.find_edge(0, 3), Some(0));
    }

    #[test]
    fn labelled_without_separators() {
        let graph = Graph::read_labelled("vertices:ABCD\nedges:AB(12),CD(7)".as_bytes()).unwrap();
        assert_eq!(graph.vertex_count(), 4);
        assert_eq!(graph.find_edge(0, 1), Some(12));
        assert_eq!(graph.find_edge(2, 3), Some(7));
    }

    #[test]
    fn labelled_errors() {
        for text in [
            "edges: AB(1)",
            "vertices: A B\nedges: AC(1)",
            "vertices: A B\nedges: AB(x)",
            "vertices: A B\nedges: AB(1",
            "vertices: A B\nedges: AA(1)",
            "vertices: A B\nedges: AB(1) BA(2)",
            "vertices: A A",
            "vertices: A B\nweights: AB(1)",
        ] {
            assert!(Graph::read_labelled(text.as_bytes()).is_err(), "{text}");
        }
    }

    #[test]
    fn metis_unweighted() {
        let text = "% square\n4 4\n2 4\n1 3\n2 4\n1 3\n";
        let graph = Graph::read_metis(text.as_bytes()).unwrap();
        assert_eq!(graph.vertex_count(), 4);
        assert_eq!(graph.edge_count(), 4);
        assert_eq!(graph.find_edge(0, 3), Some(1));
        assert_eq!(graph.label(0), "1");
    }

    #[test]
    fn metis_weighted() {
        let text = "3 2 001\n2 5\n1 5 3 7\n2 7\n";
        let graph = Graph::read_metis(text.as_bytes()).unwrap();
        assert_eq!(graph.find_edge(0, 1), Some(5));
        assert_eq!(graph.find_edge(1, 2), Some(7));
    }

    #[test]
    fn metis_errors() {
        for text in ["", "x 1\n", "2 1\n2\n", "2 2\n2\n1\n", "2 1\n3\n1\n", "2 1 1\n2\n1 4\n"] {
            assert!(Graph::read_metis(text.as_bytes()).is_err(), "{text:?}");
        }
    }
}
