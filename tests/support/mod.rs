//! Operations shared by the integration tests.

#![allow(dead_code)]

use plumb::prelude::*;

/// Emits every argument record unchanged.
pub struct Identity;

impl Function<()> for Identity {
    fn operate(&mut self, call: &mut dyn FunctionCall<()>, args: &Entry) -> Result<(), OpError> {
        call.output_collector().add(args.record())?;
        Ok(())
    }
}

/// Records every lifecycle call it receives, group keys and values rendered by first column.
#[derive(Default)]
pub struct CallLog {
    pub calls: Vec<String>,
}

impl Aggregator<()> for CallLog {
    fn prepare(&mut self, _call: &mut dyn AggregatorCall<()>) -> Result<(), OpError> {
        self.calls.push("prepare".to_string());
        Ok(())
    }

    fn start(&mut self, _call: &mut dyn AggregatorCall<()>, group: &Entry) -> Result<(), OpError> {
        self.calls.push(format!("start {}", group.record()[0]));
        Ok(())
    }

    fn aggregate(&mut self, _call: &mut dyn AggregatorCall<()>, args: &Entry) -> Result<(), OpError> {
        self.calls.push(format!("aggregate {}", args.record()[0]));
        Ok(())
    }

    fn complete(&mut self, call: &mut dyn AggregatorCall<()>, group: &Entry) -> Result<(), OpError> {
        self.calls.push(format!("complete {}", group.record()[0]));
        call.output_collector().add(group.record())?;
        Ok(())
    }

    fn flush(&mut self, _call: &mut dyn AggregatorCall<()>) -> Result<(), OpError> {
        self.calls.push("flush".to_string());
        Ok(())
    }

    fn cleanup(&mut self, _call: &mut dyn AggregatorCall<()>) -> Result<(), OpError> {
        self.calls.push("cleanup".to_string());
        Ok(())
    }
}

pub fn typed_ab() -> Schema {
    Schema::new(vec![
        Field::new("A", DataType::Int32, false),
        Field::new("B", DataType::Utf8, true),
    ])
}

pub fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("plumb-it-{}-{}", std::process::id(), name))
}
