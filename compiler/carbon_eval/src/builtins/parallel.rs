//! `parallel(fn, arg?, max?)`: fan function application out over workers.
//!
//! Every task runs in a forked child interpreter on a pool thread, so user
//! functions never touch the caller's scopes. Results come back in the
//! shape of whatever was fanned out over.

use carbon_patterns::{
    not_callable, CallContext, EvalError, EvalResult, NativeFn, ObjectMap, Value, WorkerPool,
};

use super::{check_arity, count_arg};

pub(super) const FUNCTIONS: &[(&str, NativeFn)] = &[("parallel", parallel)];

/// How the results are put back together.
enum Shape {
    Single,
    Array,
    Object(Vec<String>),
}

struct Task {
    function: Value,
    arg: Option<Value>,
}

fn sorted_entries(fields: &ObjectMap) -> Vec<(String, Value)> {
    let mut entries: Vec<(String, Value)> = fields
        .iter()
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    entries.sort_unstable_by(|a, b| a.0.cmp(&b.0));
    entries
}

/// Split the call into tasks.
fn plan(function: &Value, arg: Option<&Value>) -> Result<(Shape, Vec<Task>), EvalError> {
    let task = |function: &Value, arg: Option<Value>| Task {
        function: function.clone(),
        arg,
    };
    let planned = match (function, arg) {
        (Value::Function(_), Some(Value::Array(items))) => {
            let tasks: Vec<Task> = items
                .read()
                .iter()
                .map(|item| task(function, Some(item.clone())))
                .collect();
            (Shape::Array, tasks)
        }
        (Value::Function(_), Some(Value::Object(fields))) => {
            let (keys, tasks): (Vec<String>, Vec<Task>) = sorted_entries(&fields.read())
                .into_iter()
                .map(|(key, value)| (key, task(function, Some(value))))
                .unzip();
            (Shape::Object(keys), tasks)
        }
        (Value::Function(_), arg) => (Shape::Single, vec![task(function, arg.cloned())]),
        (Value::Array(functions), arg) => {
            let tasks: Vec<Task> = functions
                .read()
                .iter()
                .map(|f| task(f, arg.cloned()))
                .collect();
            (Shape::Array, tasks)
        }
        (Value::Object(functions), arg) => {
            let (keys, tasks): (Vec<String>, Vec<Task>) = sorted_entries(&functions.read())
                .into_iter()
                .map(|(key, f)| (key, task(&f, arg.cloned())))
                .unzip();
            (Shape::Object(keys), tasks)
        }
        (other, _) => return Err(not_callable(other.type_name())),
    };
    Ok(planned)
}

fn parallel(ctx: &mut dyn CallContext, args: &[Value]) -> EvalResult {
    check_arity("parallel", args, 1..=3)?;
    let max = match args.get(2) {
        Some(value) => count_arg(value)?.max(1),
        None => ctx.concurrency(),
    };
    let (shape, tasks) = plan(&args[0], args.get(1))?;

    let states: Vec<Box<dyn CallContext + Send>> =
        (0..max.min(tasks.len())).map(|_| ctx.fork()).collect();
    let results = WorkerPool::new(max).run(states, tasks, |worker, task| {
        worker.call(&task.function, task.arg.as_slice())
    });
    let values = results.into_iter().collect::<Result<Vec<Value>, _>>()?;

    Ok(match shape {
        Shape::Single => values.into_iter().next().unwrap_or(Value::None),
        Shape::Array => Value::array(values),
        Shape::Object(keys) => Value::object(keys.into_iter().zip(values).collect()),
    })
}
