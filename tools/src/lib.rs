//! Text input and output for the louvain command line tool

use anyhow::{bail, format_err, Context, Error};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use itertools::Itertools;
use louvain::{Dendrogram, Network};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// An edge list read from text, with vertex labels mapped to dense ids.
#[derive(Debug)]
pub struct EdgeList {
    /// Original label of each dense vertex id, ascending.
    pub labels: Vec<u64>,
    /// Edges as `(source, target, weight)` over dense ids.
    pub edges: Vec<(u32, u32, f64)>,
}

impl EdgeList {
    /// Number of distinct vertices.
    pub fn nodes(&self) -> usize {
        self.labels.len()
    }

    /// Dense id of an original vertex label.
    pub fn id_of(&self, label: u64) -> Option<usize> {
        self.labels.binary_search(&label).ok()
    }

    /// Build the network to cluster.
    pub fn to_network(&self) -> Network {
        Network::from_edges(self.nodes(), self.edges.iter().copied())
    }
}

/// Open `path` for reading, decompressing it if the name ends in `.gz`.
pub fn open(path: &Path) -> Result<Box<dyn BufRead>, Error> {
    let file = File::open(path).with_context(|| path.display().to_string())?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Data lines of a whitespace separated file, as (line number, fields). Blank lines and `#` comments are skipped.
fn records(reader: impl BufRead) -> impl Iterator<Item = Result<(usize, Vec<String>), Error>> {
    reader.lines().enumerate().filter_map(|(i, line)| match line {
        Err(e) => Some(Err(e.into())),
        Ok(line) => {
            let line = line.split('#').next().unwrap_or_default().trim().to_string();
            if line.is_empty() {
                None
            } else {
                Some(Ok((i + 1, line.split_whitespace().map(String::from).collect())))
            }
        }
    })
}

fn parse_field<T: std::str::FromStr>(fields: &[String], idx: usize, line: usize) -> Result<T, Error> {
    let field = fields
        .get(idx)
        .ok_or_else(|| format_err!("line {line}: expected at least {} fields", idx + 1))?;
    field
        .parse()
        .map_err(|_| format_err!("line {line}: cannot parse '{field}'"))
}

/// Read `src dst [weight]` lines. A missing weight is 1; negative and non-finite weights are rejected.
pub fn read_edge_list(reader: impl BufRead) -> Result<EdgeList, Error> {
    let mut raw = Vec::new();
    for record in records(reader) {
        let (line, fields) = record?;
        if fields.len() > 3 {
            bail!("line {line}: expected 'src dst [weight]'");
        }
        let src: u64 = parse_field(&fields, 0, line)?;
        let dst: u64 = parse_field(&fields, 1, line)?;
        let weight: f64 = if fields.len() == 3 { parse_field(&fields, 2, line)? } else { 1.0 };
        if !(weight.is_finite() && weight >= 0.0) {
            bail!("line {line}: weight must be finite and non-negative, got {weight}");
        }
        raw.push((src, dst, weight));
    }

    let labels: Vec<u64> = raw
        .iter()
        .flat_map(|&(s, d, _)| [s, d])
        .sorted_unstable()
        .dedup()
        .collect();
    if labels.len() > u32::MAX as usize {
        bail!("too many vertices: {}", labels.len());
    }

    let id = |label: u64| labels.partition_point(|&l| l < label) as u32;
    let edges = raw.iter().map(|&(s, d, w)| (id(s), id(d), w)).collect();

    Ok(EdgeList { labels, edges })
}

/// Read `vertex community` lines into a label per dense vertex. Every vertex of `edges` must appear exactly once.
pub fn read_partition(reader: impl BufRead, edges: &EdgeList) -> Result<Vec<usize>, Error> {
    let mut assigned: HashMap<usize, usize> = HashMap::new();
    for record in records(reader) {
        let (line, fields) = record?;
        let vertex: u64 = parse_field(&fields, 0, line)?;
        let community: usize = parse_field(&fields, 1, line)?;
        let id = edges
            .id_of(vertex)
            .ok_or_else(|| format_err!("line {line}: vertex {vertex} is not in the graph"))?;
        if assigned.insert(id, community).is_some() {
            bail!("line {line}: vertex {vertex} assigned twice");
        }
    }

    (0..edges.nodes())
        .map(|id| {
            assigned
                .get(&id)
                .copied()
                .ok_or_else(|| format_err!("vertex {} has no community", edges.labels[id]))
        })
        .collect()
}

/// Write `vertex,level0,level1,...` with the partition of the original vertices at every level.
pub fn write_levels(mut writer: impl Write, edges: &EdgeList, dendrogram: &Dendrogram) -> Result<(), Error> {
    let partitions = (0..dendrogram.num_levels())
        .filter_map(|level| dendrogram.partition_at(level))
        .collect::<Vec<_>>();

    writeln!(
        writer,
        "vertex,{}",
        (0..partitions.len()).map(|l| format!("level{l}")).join(",")
    )?;
    for (id, label) in edges.labels.iter().enumerate() {
        writeln!(writer, "{label},{}", partitions.iter().map(|p| p[id]).join(","))?;
    }
    writer.flush()?;
    Ok(())
}

/// Create `path` for writing, compressing it if the name ends in `.gz`.
pub fn create(path: &Path) -> Result<Box<dyn Write>, Error> {
    let file = File::create(path).with_context(|| path.display().to_string())?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(BufWriter::new(GzEncoder::new(file, Compression::default()))))
    } else {
        Ok(Box::new(BufWriter::new(file)))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use louvain::Louvain;

    const TRIANGLES: &str = "# two triangles\n10 20\n20 30 1.0\n10 30\n\n40 50\n50 60 # bridge-free\n40 60 1\n";

    #[test]
    fn reads_edge_list() {
        let edges = read_edge_list(TRIANGLES.as_bytes()).unwrap();
        assert_eq!(edges.labels, vec![10, 20, 30, 40, 50, 60]);
        assert_eq!(edges.edges[0], (0, 1, 1.0));
        assert_eq!(edges.edges.len(), 6);
        assert_eq!(edges.id_of(50), Some(4));
    }

    #[test]
    fn rejects_malformed_lines() {
        assert!(read_edge_list("1 2 3 4\n".as_bytes()).is_err());
        assert!(read_edge_list("1 x\n".as_bytes()).is_err());
        assert!(read_edge_list("1\n".as_bytes()).is_err());
    }

    #[test]
    fn rejects_invalid_weights() {
        for text in ["1 2 -5\n2 3 1\n3 1 1\n", "1 2 1\n2 3 NaN\n", "# inf\n1 2 inf\n"] {
            let err = read_edge_list(text.as_bytes()).unwrap_err();
            assert!(err.to_string().starts_with("line "), "{err}");
        }
        let err = read_edge_list("1 2 1\n2 3 NaN\n".as_bytes()).unwrap_err();
        assert_eq!(err.to_string(), "line 2: weight must be finite and non-negative, got NaN");
        assert!(read_edge_list("1 2 0\n".as_bytes()).is_ok());
    }

    #[test]
    fn reads_partition() {
        let edges = read_edge_list(TRIANGLES.as_bytes()).unwrap();
        let p = read_partition("60 1\n50 1\n40 1\n10 0\n20 0\n30 7\n".as_bytes(), &edges).unwrap();
        assert_eq!(p, vec![0, 0, 7, 1, 1, 1]);

        assert!(read_partition("10 0\n".as_bytes(), &edges).is_err());
        assert!(read_partition("99 0\n".as_bytes(), &edges).is_err());
        assert!(read_partition("10 0\n10 1\n".as_bytes(), &edges).is_err());
    }

    #[test]
    fn writes_levels() {
        let edges = read_edge_list(TRIANGLES.as_bytes()).unwrap();
        let d = Louvain::default().run_network(&edges.to_network(), None).unwrap();

        let mut out = Vec::new();
        write_levels(&mut out, &edges, &d).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "vertex,level0\n10,0\n20,0\n30,0\n40,1\n50,1\n60,1\n");
    }
}
