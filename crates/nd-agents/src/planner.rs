//! Project planner: orders research tasks and partitions them into
//! bounded-size batches for controlled parallel execution.

use std::collections::{HashMap, VecDeque};

use nd_core::{BusinessField, Error, ResearchTask, Settings, TaskPriority};

/// Second stage of the pipeline. Pure: ordering and chunking only.
pub struct ProjectPlannerAgent {
    max_parallel_tasks: usize,
    priority: TaskPriority,
}

impl ProjectPlannerAgent {
    pub fn new(max_parallel_tasks: usize, priority: TaskPriority) -> Self {
        Self {
            max_parallel_tasks,
            priority,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.research.max_parallel_tasks,
            settings.research.task_priority,
        )
    }

    /// Order the task list by the configured priority mode, then split it
    /// into batches of at most `max_parallel_tasks`. Every input task lands
    /// in exactly one batch and order is preserved within a batch.
    pub fn plan_research(
        &self,
        tasks: Vec<ResearchTask>,
    ) -> Result<Vec<Vec<ResearchTask>>, Error> {
        if self.max_parallel_tasks == 0 {
            return Err(Error::planning("max_parallel_tasks must be positive"));
        }

        let ordered = order_tasks(tasks, self.priority);
        let batches = ordered
            .chunks(self.max_parallel_tasks)
            .map(|chunk| chunk.to_vec())
            .collect();
        Ok(batches)
    }
}

/// Apply the total order for a priority mode. All modes are deterministic,
/// with the task id as tie-break:
/// - `Depth`: keyword count descending (keyword-heaviest tasks first)
/// - `Breadth`: keyword count ascending (cheapest scans first)
/// - `Balanced`: round-robin interleave across business fields, fields in
///   first-appearance order, tasks within a field ordered by id
fn order_tasks(mut tasks: Vec<ResearchTask>, priority: TaskPriority) -> Vec<ResearchTask> {
    match priority {
        TaskPriority::Depth => {
            tasks.sort_by(|a, b| {
                b.keywords
                    .len()
                    .cmp(&a.keywords.len())
                    .then_with(|| a.id.cmp(&b.id))
            });
            tasks
        }
        TaskPriority::Breadth => {
            tasks.sort_by(|a, b| {
                a.keywords
                    .len()
                    .cmp(&b.keywords.len())
                    .then_with(|| a.id.cmp(&b.id))
            });
            tasks
        }
        TaskPriority::Balanced => interleave_fields(tasks),
    }
}

fn interleave_fields(tasks: Vec<ResearchTask>) -> Vec<ResearchTask> {
    let mut field_order: Vec<BusinessField> = Vec::new();
    let mut groups: HashMap<BusinessField, Vec<ResearchTask>> = HashMap::new();
    for task in tasks {
        if !field_order.contains(&task.field) {
            field_order.push(task.field);
        }
        groups.entry(task.field).or_default().push(task);
    }

    let mut queues: Vec<VecDeque<ResearchTask>> = field_order
        .iter()
        .map(|field| {
            let mut group = groups.remove(field).unwrap_or_default();
            group.sort_by(|a, b| a.id.cmp(&b.id));
            group.into()
        })
        .collect();

    let mut ordered = Vec::new();
    loop {
        let mut progressed = false;
        for queue in &mut queues {
            if let Some(task) = queue.pop_front() {
                ordered.push(task);
                progressed = true;
            }
        }
        if !progressed {
            break;
        }
    }
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, field: BusinessField, keyword_count: usize) -> ResearchTask {
        let keywords = (0..keyword_count).map(|i| format!("kw-{i}")).collect();
        ResearchTask::new(id, field, keywords)
    }

    #[test]
    fn test_batch_count_and_sizes() {
        let planner = ProjectPlannerAgent::new(2, TaskPriority::Depth);
        let tasks = vec![
            task("t1", BusinessField::Hpc, 1),
            task("t2", BusinessField::Hpc, 1),
            task("t3", BusinessField::Bitcoin, 1),
            task("t4", BusinessField::Bitcoin, 1),
            task("t5", BusinessField::EnergyStorage, 1),
        ];

        let batches = planner.plan_research(tasks).unwrap();
        assert_eq!(batches.len(), 3);
        assert_eq!(batches[0].len(), 2);
        assert_eq!(batches[1].len(), 2);
        assert_eq!(batches[2].len(), 1);
    }

    #[test]
    fn test_exact_multiple_fills_last_batch() {
        let planner = ProjectPlannerAgent::new(2, TaskPriority::Breadth);
        let tasks = vec![
            task("t1", BusinessField::Hpc, 1),
            task("t2", BusinessField::Hpc, 2),
            task("t3", BusinessField::Bitcoin, 3),
            task("t4", BusinessField::Bitcoin, 4),
        ];
        let batches = planner.plan_research(tasks).unwrap();
        assert_eq!(batches.len(), 2);
        assert!(batches.iter().all(|b| b.len() == 2));
    }

    #[test]
    fn test_batches_cover_input_exactly_once() {
        let planner = ProjectPlannerAgent::new(3, TaskPriority::Balanced);
        let tasks: Vec<ResearchTask> = (0..7)
            .map(|i| task(&format!("t{i}"), BusinessField::Hpc, i))
            .collect();
        let input_ids: Vec<String> = tasks.iter().map(|t| t.id.clone()).collect();

        let batches = planner.plan_research(tasks).unwrap();
        let mut flattened: Vec<String> = batches
            .into_iter()
            .flatten()
            .map(|t| t.id)
            .collect();
        assert_eq!(flattened.len(), input_ids.len());
        flattened.sort();
        let mut expected = input_ids;
        expected.sort();
        assert_eq!(flattened, expected);
    }

    #[test]
    fn test_depth_orders_keyword_heavy_first() {
        let planner = ProjectPlannerAgent::new(10, TaskPriority::Depth);
        let tasks = vec![
            task("t-a", BusinessField::Hpc, 1),
            task("t-b", BusinessField::Bitcoin, 4),
            task("t-c", BusinessField::EnergyStorage, 2),
        ];
        let batches = planner.plan_research(tasks).unwrap();
        let ids: Vec<&str> = batches[0].iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t-b", "t-c", "t-a"]);
    }

    #[test]
    fn test_breadth_orders_cheapest_first_with_id_tiebreak() {
        let planner = ProjectPlannerAgent::new(10, TaskPriority::Breadth);
        let tasks = vec![
            task("t-b", BusinessField::Bitcoin, 2),
            task("t-a", BusinessField::Hpc, 2),
            task("t-c", BusinessField::EnergyStorage, 1),
        ];
        let batches = planner.plan_research(tasks).unwrap();
        let ids: Vec<&str> = batches[0].iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t-c", "t-a", "t-b"]);
    }

    #[test]
    fn test_balanced_interleaves_fields() {
        let planner = ProjectPlannerAgent::new(10, TaskPriority::Balanced);
        let tasks = vec![
            task("t1", BusinessField::Hpc, 1),
            task("t2", BusinessField::Hpc, 1),
            task("t3", BusinessField::Bitcoin, 1),
            task("t4", BusinessField::Bitcoin, 1),
        ];
        let batches = planner.plan_research(tasks).unwrap();
        let fields: Vec<BusinessField> = batches[0].iter().map(|t| t.field).collect();
        assert_eq!(
            fields,
            vec![
                BusinessField::Hpc,
                BusinessField::Bitcoin,
                BusinessField::Hpc,
                BusinessField::Bitcoin,
            ]
        );
    }

    #[test]
    fn test_zero_batch_size_is_a_planning_error() {
        let planner = ProjectPlannerAgent::new(0, TaskPriority::Balanced);
        let err = planner
            .plan_research(vec![task("t1", BusinessField::Hpc, 1)])
            .unwrap_err();
        assert!(matches!(err, Error::Planning(_)));
    }

    #[test]
    fn test_empty_input_yields_no_batches() {
        let planner = ProjectPlannerAgent::new(3, TaskPriority::Balanced);
        assert!(planner.plan_research(Vec::new()).unwrap().is_empty());
    }
}
