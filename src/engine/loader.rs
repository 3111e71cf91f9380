//! 图文件加载
//!
//! 支持两种文本格式：
//! - `edgelist`：每行 `src dst [value]`，value 列被忽略
//! - `adjlist`：每行 `src count dst1 ... dstN`
//!
//! 分隔符可为空白、制表符或逗号；以 `#` 或 `%` 开头的行与空行被跳过。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use super::{Graph, GraphBuilder};
use crate::core::{GraphError, VertexId};

/// 图文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphFormat {
    #[default]
    EdgeList,
    AdjList,
}

impl FromStr for GraphFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "edgelist" | "edge-list" | "edges" => Ok(GraphFormat::EdgeList),
            "adjlist" | "adj-list" | "adjacency" => Ok(GraphFormat::AdjList),
            other => Err(format!("未知的图格式: {}", other)),
        }
    }
}

impl fmt::Display for GraphFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphFormat::EdgeList => write!(f, "edgelist"),
            GraphFormat::AdjList => write!(f, "adjlist"),
        }
    }
}

/// 从文件加载图
pub fn load_graph<P: AsRef<Path>>(
    path: P,
    format: GraphFormat,
    min_vertices: usize,
) -> Result<Graph, GraphError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| GraphError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("加载图文件: {} (格式 {})", path.display(), format);
    parse_graph(BufReader::new(file), format, min_vertices).map_err(|err| match err {
        GraphError::Io { source, .. } => GraphError::Io {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })
}

/// 从任意输入流解析图
pub fn parse_graph<R: BufRead>(
    reader: R,
    format: GraphFormat,
    min_vertices: usize,
) -> Result<Graph, GraphError> {
    let mut builder = GraphBuilder::new();
    let mut min_vertices = min_vertices;

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line.map_err(|source| GraphError::Io {
            path: Default::default(),
            source,
        })?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('%') {
            continue;
        }

        let mut fields = trimmed
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|field| !field.is_empty());

        match format {
            GraphFormat::EdgeList => {
                let src = parse_vertex(fields.next(), line_no, "起点")?;
                let dst = parse_vertex(fields.next(), line_no, "终点")?;
                builder.add_edge(src, dst);
            }
            GraphFormat::AdjList => {
                let src = parse_vertex(fields.next(), line_no, "起点")?;
                let count = fields
                    .next()
                    .ok_or_else(|| GraphError::parse(line_no, "缺少邻居数量"))?
                    .parse::<usize>()
                    .map_err(|e| GraphError::parse(line_no, format!("邻居数量无效: {}", e)))?;
                let mut seen = 0usize;
                for field in fields.by_ref().take(count) {
                    let dst = parse_vertex(Some(field), line_no, "邻居")?;
                    builder.add_edge(src, dst);
                    seen += 1;
                }
                if seen != count {
                    return Err(GraphError::parse(
                        line_no,
                        format!("声明 {} 个邻居, 实际 {} 个", count, seen),
                    ));
                }
                // 无出边的顶点也要计入顶点数
                min_vertices = min_vertices.max(src as usize + 1);
            }
        }
    }

    log::debug!("解析完成: {} 条边", builder.num_edges());
    builder.with_vertex_count(min_vertices).build()
}

fn parse_vertex(field: Option<&str>, line: usize, what: &str) -> Result<VertexId, GraphError> {
    let field = field.ok_or_else(|| GraphError::parse(line, format!("缺少{}", what)))?;
    let vertex = field
        .parse::<VertexId>()
        .map_err(|e| GraphError::parse(line, format!("{} '{}' 无效: {}", what, field, e)))?;
    if vertex == VertexId::MAX {
        return Err(GraphError::parse(line, format!("{} '{}' 为保留ID", what, field)));
    }
    Ok(vertex)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_edgelist_with_comments_and_values() {
        let input = "# path graph\n% another comment\n\n0 1\n1\t2 7\n2,3\n";
        let graph = parse_graph(Cursor::new(input), GraphFormat::EdgeList, 0)
            .expect("edge list should parse");
        assert_eq!(graph.num_vertices(), 4);
        assert_eq!(graph.edges().collect::<Vec<_>>(), vec![(0, 1), (1, 2), (2, 3)]);
    }

    #[test]
    fn test_parse_adjlist() {
        let input = "0 2 1 2\n1 1 3\n2 1 3\n";
        let graph = parse_graph(Cursor::new(input), GraphFormat::AdjList, 0)
            .expect("adjacency list should parse");
        assert_eq!(graph.num_edges(), 4);
        assert_eq!(graph.in_neighbors(3), &[1, 2]);
    }

    #[test]
    fn test_adjlist_zero_degree_vertex_counts() {
        let graph = parse_graph(Cursor::new("0 1 1\n5 0\n"), GraphFormat::AdjList, 0)
            .expect("adjacency list should parse");
        assert_eq!(graph.num_vertices(), 6);
    }

    #[test]
    fn test_adjlist_count_mismatch() {
        let err = parse_graph(Cursor::new("0 3 1 2\n"), GraphFormat::AdjList, 0)
            .expect_err("short neighbour list should fail");
        assert!(matches!(err, GraphError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_parse_error_reports_line() {
        let err = parse_graph(Cursor::new("0 1\n1 x\n"), GraphFormat::EdgeList, 0)
            .expect_err("bad vertex id should fail");
        match err {
            GraphError::Parse { line, message } => {
                assert_eq!(line, 2);
                assert!(message.contains('x'));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_missing_destination() {
        let err = parse_graph(Cursor::new("4\n"), GraphFormat::EdgeList, 0)
            .expect_err("missing destination should fail");
        assert!(matches!(err, GraphError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_load_graph_from_file() {
        let mut file = NamedTempFile::new().expect("Failed to create temporary file");
        writeln!(file, "0 1\n1 2").expect("Failed to write graph file");
        let graph = load_graph(file.path(), GraphFormat::EdgeList, 5).expect("graph should load");
        assert_eq!(graph.num_vertices(), 5);
        assert_eq!(graph.num_edges(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_graph("/nonexistent/graph.txt", GraphFormat::EdgeList, 0)
            .expect_err("missing file should fail");
        assert!(matches!(err, GraphError::Io { .. }));
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("EdgeList".parse::<GraphFormat>(), Ok(GraphFormat::EdgeList));
        assert_eq!("adjlist".parse::<GraphFormat>(), Ok(GraphFormat::AdjList));
        assert!("csv".parse::<GraphFormat>().is_err());
    }
}
