use action_core::{
    ActionContext, ActionId, ActionModule, ActionObserver, AnyModules, Capabilities, EntityHandle,
    EventRegistry, GroupError, GroupId, GroupKind, ModuleBehavior, ModuleFilter, ModuleGroup,
    ModuleGroupBase, ModuleId, ModuleKey, RunMode, SimpleClip, StateFlags, Triggers,
};

#[derive(Debug, PartialEq, Eq)]
struct Marker(u8);

impl ModuleBehavior for Marker {
    fn capabilities(&self) -> Capabilities {
        Capabilities::empty()
    }
}

#[derive(Debug)]
struct Other;

impl ModuleBehavior for Other {
    fn capabilities(&self) -> Capabilities {
        Capabilities::empty()
    }
}

#[derive(Default)]
struct Recorder {
    added: Vec<ModuleKey>,
    removed: Vec<ModuleKey>,
    attached: Vec<String>,
}

impl ActionObserver for Recorder {
    fn on_module_added(&mut self, _group: GroupId, module: &ActionModule) {
        self.added.push(module.key());
    }

    fn on_module_removed(&mut self, _group: GroupId, module: &ActionModule) {
        self.removed.push(module.key());
    }

    fn on_module_attached_in_editor(&mut self, _group: GroupId, module: &ActionModule) {
        self.attached.push(module.name().to_owned());
    }
}

struct Harness {
    action: ActionId,
    mode: RunMode,
    template: bool,
    events: EventRegistry,
    states: StateFlags,
    observer: Recorder,
}

impl Harness {
    fn running() -> Self {
        Self {
            action: ActionId(1),
            mode: RunMode::Running,
            template: false,
            events: EventRegistry::new(),
            states: StateFlags::new(),
            observer: Recorder::default(),
        }
    }

    fn cx(&mut self) -> ActionContext<'_> {
        ActionContext {
            action: self.action,
            character: EntityHandle(7),
            mode: self.mode,
            template: self.template,
            equipped: false,
            events: &mut self.events,
            states: &mut self.states,
            observer: &mut self.observer,
        }
    }
}

fn marker(tag: u8) -> ActionModule {
    ActionModule::new(format!("marker-{tag}"), Marker(tag))
}

fn assert_partition<K: GroupKind>(group: &ModuleGroup<K>) {
    let mut covered: Vec<usize> = group
        .enabled_indices()
        .iter()
        .chain(group.disabled_indices())
        .copied()
        .collect();
    covered.sort_unstable();
    let present: Vec<usize> = (0..group.len())
        .filter(|&index| group.module_at(index).is_some())
        .collect();
    assert_eq!(covered, present, "caches must cover every present module once");

    for &index in group.enabled_indices() {
        assert!(group.module_at(index).unwrap().is_enabled());
    }
    for &index in group.disabled_indices() {
        assert!(!group.module_at(index).unwrap().is_enabled());
    }
    assert!(group.enabled_indices().windows(2).all(|w| w[0] < w[1]));
    assert!(group.disabled_indices().windows(2).all(|w| w[0] < w[1]));
}

fn enabled_tags(group: &ModuleGroup<AnyModules>) -> Vec<u8> {
    group
        .enabled_modules()
        .filter_map(|module| module.behavior_as::<Marker>())
        .map(|marker| marker.0)
        .collect()
}

#[test]
fn caches_partition_modules_across_mutations() {
    let mut h = Harness::running();
    let mut group = ModuleGroup::<AnyModules>::from_modules([
        marker(0),
        marker(1).with_enabled(false),
        marker(2),
    ]);
    group.initialize(&mut h.cx()).unwrap();
    assert_partition(&group);

    group
        .add_module(marker(3).with_enabled(false), &mut h.cx())
        .unwrap();
    assert_partition(&group);

    assert!(group.set_module_enabled(1, true, &mut h.cx()));
    assert_partition(&group);

    assert!(group.set_module_enabled(0, false, &mut h.cx()));
    assert_partition(&group);

    let id = group.module_at(2).unwrap().id();
    assert!(group.remove_module(id, &mut h.cx()).unwrap().is_some());
    assert_partition(&group);

    assert!(group.remove_module_at(0, &mut h.cx()).unwrap().is_some());
    assert_partition(&group);
    assert_eq!(group.module_count(), 2);
}

#[test]
fn setting_current_value_is_a_no_op() {
    let mut h = Harness::running();
    let mut group = ModuleGroup::<AnyModules>::from_modules([marker(0)]);
    group.initialize(&mut h.cx()).unwrap();

    assert!(!group.set_module_enabled(0, true, &mut h.cx()));
    assert_eq!(group.enabled_indices(), &[0]);
}

#[test]
fn initialize_is_idempotent() {
    let mut h = Harness::running();
    let mut group = ModuleGroup::<AnyModules>::from_modules([marker(0), marker(1)]);

    group.initialize(&mut h.cx()).unwrap();
    group.initialize(&mut h.cx()).unwrap();

    assert!(group.is_initialized());
    assert_eq!(group.action(), ActionId(1));
    assert_eq!(h.observer.added.len(), 2);
    let ids: Vec<ModuleId> = group.modules().map(ActionModule::id).collect();
    assert_eq!(ids, [ModuleId(0), ModuleId(1)]);
    assert!(group.modules().all(ActionModule::is_initialized));
}

#[test]
fn initialize_without_action_is_rejected() {
    let mut h = Harness::running();
    h.action = ActionId::UNASSIGNED;
    let mut group = ModuleGroup::<AnyModules>::from_modules([marker(0)]);

    let err = group.initialize(&mut h.cx()).unwrap_err();
    assert_eq!(err, GroupError::MissingAction { group: "modules" });
    assert!(!group.is_initialized());
    assert!(h.observer.added.is_empty());
}

#[test]
fn caches_keep_main_sequence_order() {
    let mut h = Harness::running();
    let mut group = ModuleGroup::<AnyModules>::from_modules(
        (0..4).map(|tag| marker(tag).with_enabled(false)),
    );
    group.initialize(&mut h.cx()).unwrap();

    group.set_module_enabled(3, true, &mut h.cx());
    group.set_module_enabled(0, true, &mut h.cx());
    group.set_module_enabled(2, true, &mut h.cx());

    assert_eq!(group.enabled_indices(), &[0, 2, 3]);
    assert_eq!(group.disabled_indices(), &[1]);
    assert_eq!(enabled_tags(&group), [0, 2, 3]);
}

fn abc(enabled: [bool; 3]) -> (Harness, ModuleGroup<AnyModules>) {
    let mut h = Harness::running();
    let mut group = ModuleGroup::<AnyModules>::from_modules(
        enabled
            .into_iter()
            .enumerate()
            .map(|(tag, on)| marker(tag as u8).with_enabled(on)),
    );
    group.initialize(&mut h.cx()).unwrap();
    (h, group)
}

#[test]
fn switch_next_moves_to_neighbor() {
    let (mut h, mut group) = abc([true, false, false]);

    assert!(group.switch_to_next_module(true, &mut h.cx()));
    assert_eq!(enabled_tags(&group), [1]);
    assert_partition(&group);
}

#[test]
fn switch_next_wraps_when_looped() {
    let (mut h, mut group) = abc([false, false, true]);

    assert!(group.switch_to_next_module(true, &mut h.cx()));
    assert_eq!(enabled_tags(&group), [0]);
}

#[test]
fn switch_next_stops_at_end_without_loop() {
    let (mut h, mut group) = abc([false, false, true]);

    assert!(!group.switch_to_next_module(false, &mut h.cx()));
    assert_eq!(enabled_tags(&group), [2]);
    assert_eq!(group.disabled_indices(), &[0, 1]);
}

#[test]
fn switch_previous_wraps_or_stops() {
    let (mut h, mut group) = abc([true, false, false]);
    assert!(!group.switch_to_previous_module(false, &mut h.cx()));
    assert_eq!(enabled_tags(&group), [0]);

    assert!(group.switch_to_previous_module(true, &mut h.cx()));
    assert_eq!(enabled_tags(&group), [2]);
}

#[test]
fn switch_with_nothing_enabled_enables_first_disabled() {
    let (mut h, mut group) = abc([false, false, false]);

    assert!(group.switch_to_next_module(false, &mut h.cx()));
    assert_eq!(enabled_tags(&group), [0]);
}

#[test]
fn switch_steps_over_empty_slots() {
    let mut h = Harness::running();
    let mut group = ModuleGroup::<AnyModules>::from_slots(vec![
        Some(marker(0)),
        None,
        Some(marker(2).with_enabled(false)),
    ]);
    group.initialize(&mut h.cx()).unwrap();

    assert!(group.switch_to_next_module(false, &mut h.cx()));
    assert_eq!(enabled_tags(&group), [2]);

    assert!(!group.switch_to_next_module(false, &mut h.cx()));
    assert!(group.switch_to_previous_module(false, &mut h.cx()));
    assert_eq!(enabled_tags(&group), [0]);

    assert!(group.switch_to_previous_module(true, &mut h.cx()));
    assert_eq!(enabled_tags(&group), [2]);
    assert_partition(&group);
}

#[test]
fn first_enabled_with_type_picks_lowest_index() {
    let mut h = Harness::running();
    let mut group = ModuleGroup::<AnyModules>::from_modules([
        marker(0).with_enabled(false),
        ActionModule::new("other", Other),
        marker(2),
        marker(3),
    ]);
    group.initialize(&mut h.cx()).unwrap();

    assert_eq!(group.first_enabled_with_type::<Marker>(), Some(&Marker(2)));
    assert!(group.first_enabled_with_type::<SimpleClip>().is_none());

    group.set_module_enabled(2, false, &mut h.cx());
    group.set_module_enabled(3, false, &mut h.cx());
    assert!(group.first_enabled_with_type::<Marker>().is_none());
}

#[test]
fn removing_absent_module_is_a_no_op() {
    let (mut h, mut group) = abc([true, false, false]);

    let removed = group.remove_module(ModuleId(42), &mut h.cx()).unwrap();
    assert!(removed.is_none());
    assert!(group.remove_module_at(9, &mut h.cx()).unwrap().is_none());
    assert_eq!(group.module_count(), 3);
    assert!(h.observer.removed.is_empty());
}

#[test]
fn runtime_set_modules_empty_clears_everything() {
    let (mut h, mut group) = abc([true, false, true]);

    group.set_modules(Vec::new(), &mut h.cx()).unwrap();

    assert_eq!(group.len(), 0);
    assert!(group.enabled_indices().is_empty());
    assert!(group.disabled_indices().is_empty());
    assert_eq!(h.observer.removed.len(), 3);
}

#[test]
fn runtime_set_modules_skips_empty_and_mismatched_slots() {
    let mut h = Harness::running();
    let mut group = ModuleGroup::<Triggers>::new();
    group.initialize(&mut h.cx()).unwrap();

    let replacement = vec![
        Some(ActionModule::new("semi", action_core::SingleTrigger::new(0))),
        None,
        Some(marker(1)),
    ];
    group.set_modules(replacement, &mut h.cx()).unwrap();

    assert_eq!(group.len(), 1);
    assert_eq!(group.module_at(0).unwrap().name(), "semi");
    assert_eq!(h.observer.added.len(), 1);
}

#[test]
fn typed_group_rejects_wrong_capability() {
    let mut h = Harness::running();
    let mut group = ModuleGroup::<Triggers>::new();
    group.initialize(&mut h.cx()).unwrap();

    let err = group.add_module(marker(0), &mut h.cx()).unwrap_err();
    assert!(matches!(err, GroupError::TypeMismatch { group: "triggers", .. }));
    assert!(group.is_empty());
}

#[test]
fn template_groups_refuse_runtime_edits() {
    let mut h = Harness::running();
    h.template = true;
    let mut group = ModuleGroup::<AnyModules>::from_modules([marker(0)]);
    group.initialize(&mut h.cx()).unwrap();

    let err = group.add_module(marker(1), &mut h.cx()).unwrap_err();
    assert_eq!(err, GroupError::TemplateLocked { action: ActionId(1) });

    let id = group.module_at(0).unwrap().id();
    assert!(group.remove_module(id, &mut h.cx()).is_err());
    assert_eq!(group.module_count(), 1);
}

#[test]
fn authoring_edits_data_only() {
    let mut h = Harness::running();
    h.mode = RunMode::Authoring;
    let mut group = ModuleGroup::<AnyModules>::new();

    group.add_module(marker(0), &mut h.cx()).unwrap();
    assert_eq!(h.observer.attached, ["marker-0"]);
    assert!(h.observer.added.is_empty());
    assert!(!group.module_at(0).unwrap().is_initialized());
    assert_eq!(group.enabled_indices(), &[0]);

    group
        .set_modules(vec![Some(marker(1)), None], &mut h.cx())
        .unwrap();
    assert_eq!(group.len(), 2);
    assert!(h.observer.removed.is_empty());
}

#[test]
fn authoring_set_modules_rejects_wrong_capability() {
    let mut h = Harness::running();
    h.mode = RunMode::Authoring;
    let mut group = ModuleGroup::<Triggers>::new();

    group
        .set_modules(
            vec![
                Some(ActionModule::new("mag", SimpleClip::new(3))),
                Some(ActionModule::new("semi", action_core::SingleTrigger::new(0))),
            ],
            &mut h.cx(),
        )
        .unwrap();

    assert_eq!(group.len(), 2);
    assert!(group.module_at(0).is_none());
    assert_eq!(group.module_at(1).unwrap().name(), "semi");
    assert_eq!(group.enabled_indices(), &[1]);
}

#[test]
fn empty_slots_are_skipped_at_initialize() {
    let mut h = Harness::running();
    let mut group =
        ModuleGroup::<AnyModules>::from_slots(vec![Some(marker(0)), None, Some(marker(2))]);
    group.initialize(&mut h.cx()).unwrap();

    assert_eq!(group.len(), 3);
    assert_eq!(group.module_count(), 2);
    assert_eq!(group.enabled_indices(), &[0, 2]);
    assert_eq!(h.observer.added.len(), 2);
}

#[test]
fn duplicate_module_ids_are_reassigned() {
    let mut h = Harness::running();
    let mut group = ModuleGroup::<AnyModules>::from_modules([
        marker(0).with_id(ModuleId(5)),
        marker(1).with_id(ModuleId(5)),
    ]);
    group.initialize(&mut h.cx()).unwrap();

    let ids: Vec<ModuleId> = group.modules().map(ActionModule::id).collect();
    assert_eq!(ids, [ModuleId(5), ModuleId(6)]);
}

#[test]
fn module_id_at_upper_bound_does_not_overflow() {
    let mut h = Harness::running();
    let mut group = ModuleGroup::<AnyModules>::from_modules([
        marker(0).with_id(ModuleId(i32::MAX)),
        marker(1),
        marker(2).with_id(ModuleId(i32::MAX)),
    ]);
    group.initialize(&mut h.cx()).unwrap();

    let ids: Vec<ModuleId> = group.modules().map(ActionModule::id).collect();
    assert_eq!(ids, [ModuleId(i32::MAX), ModuleId(0), ModuleId(1)]);
}

#[test]
fn collect_modules_appends_spans() {
    let (_h, group) = abc([true, false, true]);
    let mut out = Vec::new();

    let enabled = group.collect_modules(ModuleFilter::Enabled, Capabilities::empty(), &mut out);
    let disabled = group.collect_modules(ModuleFilter::Disabled, Capabilities::empty(), &mut out);

    assert_eq!((enabled.start, enabled.count), (0, 2));
    assert_eq!((disabled.start, disabled.count), (2, 1));
    assert_eq!(disabled.slice(&out)[0].name(), "marker-1");

    let triggers = group.collect_modules(ModuleFilter::All, Capabilities::TRIGGER, &mut out);
    assert!(triggers.is_empty());
}

#[test]
fn index_of_uses_identity() {
    let (_h, group) = abc([true, true, true]);
    let second = group.module_at(1).unwrap();

    assert_eq!(group.index_of(second), Some(1));
    assert_eq!(group.index_of_id(second.id()), Some(1));
    assert_eq!(group.index_of(&marker(1)), None);
}
