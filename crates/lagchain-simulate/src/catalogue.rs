use lagchain_core::structural::{AblationSpec, StructuralConfig};

/// The standard scenario set for a config:
///
/// 1. `Full_main`
/// 2. one `No<P>to<C>` per configured main-chain edge not ending at the
///    terminal node
/// 3. `None` (every edge removed)
/// 4. one `No<P>to<T>` per configured inbound edge of the terminal node,
///    by parent order
/// 5. `None<T>` (every inbound edge of the terminal node removed)
///
/// Only configured edges appear, so every spec validates against `config`.
pub fn standard_catalogue(config: &StructuralConfig) -> Vec<AblationSpec> {
    let terminal = config.terminal();
    let mut specs = vec![AblationSpec::full()];
    specs.extend(
        config
            .main_chain()
            .into_iter()
            .filter(|e| e.child != terminal)
            .map(AblationSpec::remove_edge),
    );
    specs.push(AblationSpec::remove_all());

    let mut terminal_edges: Vec<_> = config.inbound(terminal).into_iter().cloned().collect();
    terminal_edges.sort_by_key(|e| config.node_index(&e.parent));
    specs.extend(terminal_edges.into_iter().map(AblationSpec::remove_edge));
    specs.push(AblationSpec::remove_inbound(terminal));
    specs
}
