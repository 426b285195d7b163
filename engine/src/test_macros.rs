/// Builds a static hashmap
macro_rules! map(
    { $($key:expr => $value:expr),+ } => {
        {
            let mut m = ::std::collections::HashMap::new();
            $(
                m.insert($key, $value);
            )+
            m
        }
        };
);

/// Converts a list of named, typed ports into input definitions.
macro_rules! node_input_defs {
    ($($name:ident: $type:ident),*) => {vec![
        $(::huegraph_shared::node_def::NodeInputDef::new(
            stringify!($name),
            ::huegraph_shared::node_value::NodeValueType::$type,
        )),*
    ]};
}

/// Converts a list of named, typed ports into output definitions.
macro_rules! node_output_defs {
    ($($name:ident: $type:ident),*) => {vec![
        $(::huegraph_shared::node_def::NodeOutputDef::new(
            stringify!($name),
            ::huegraph_shared::node_value::NodeValueType::$type,
        )),*
    ]};
}

/// Builds a NodeDef with a function runner from a lambda body. The first
/// identifier names the `NodeArgs` binding visible to the body.
macro_rules! node_def_from_fn {
    (|$args:ident; $($name:ident: $type:ident),*| -> ($($oname:ident: $otype:ident),*) $body:block) => {
        ::huegraph_shared::node_def::NodeDef {
            desc: ::huegraph_shared::node_def::NodeDefBasicDescription::new(
                "Test Node",
                "Test Description",
            ),
            inputs: node_input_defs!($($name: $type),*),
            outputs: node_output_defs!($($oname: $otype),*),
            params: vec![],
            runner: ::huegraph_shared::node_def::NodeDefRunner::Function(
                |$args| $body,
            ),
        }
    };
}
