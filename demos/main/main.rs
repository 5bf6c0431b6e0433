use anyhow::Result;
use kl_bisection::{Bisection, Graph, VertexId};
use std::path::Path;
use std::time;

fn main() -> Result<()> {
    env_logger::init();
    let path = std::env::args().nth(1).unwrap_or_else(|| "graph.txt".to_string());
    let path = Path::new(&path);

    let graph = if path.extension().is_some_and(|ext| ext == "graph") {
        Graph::deserialize_metis(path)?
    } else {
        Graph::from_labelled_file(path)?
    };

    let t1 = time::Instant::now();
    let bisection = Bisection::compute(&graph)?;
    let elapsed = t1.elapsed();

    let names = |group: Vec<VertexId>| {
        group
            .into_iter()
            .map(|v| graph.label(v))
            .collect::<Vec<_>>()
            .join(" ")
    };
    println!("Group A: {}", names(bisection.group_a()));
    println!("Group B: {}", names(bisection.group_b()));
    println!("Cut cost: {}", bisection.cut_cost());
    println!("time: {}ms", elapsed.as_millis());
    Ok(())
}
