pub fn run() -> anyhow::Result<()> {
    println!("cogroute {}", env!("CARGO_PKG_VERSION"));
    println!("Attention-aware routing of agent work to human operators");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_output() {
        let result = run();
        assert!(result.is_ok());
    }
}
