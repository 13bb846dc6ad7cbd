use std::sync::{Arc, Mutex, MutexGuard, RwLock};

/// Shared cooperative stop flag.
///
/// Clones point to the same flag, so a stop requested from one place is observed by everyone
/// holding a clone, the next time they check it.
#[derive(Clone, Debug)]
pub struct Flag(Arc<RwLock<bool>>);

impl Flag {
    pub fn new() -> Self {
        Flag(Arc::new(RwLock::new(false)))
    }

    pub fn stop(&self) {
        *self.0.write().unwrap() = true;
    }

    pub fn is_stopped(&self) -> bool {
        *self.0.read().unwrap()
    }
}

impl PartialEq for Flag {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Flag {}

impl Default for Flag {
    fn default() -> Self {
        Self::new()
    }
}

/// Progress of a job together with its stop flag.
///
/// Child handles created by [`ProgressHandle::split`] share the stop flag of the parent and
/// are summed into [`ProgressHandle::progress`].
#[derive(Clone, Debug)]
pub struct ProgressHandle {
    progress: Arc<Mutex<Progress>>,
    children: Arc<Mutex<Vec<ProgressHandle>>>,
    flag: Flag,
}

impl ProgressHandle {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self::with_flag(Flag::new())
    }

    pub fn with_flag(flag: Flag) -> Self {
        Self {
            progress: Arc::new(Mutex::new(Progress::default())),
            children: Arc::new(Mutex::new(Vec::new())),
            flag,
        }
    }

    pub fn split(&self) -> Self {
        let child = Self::with_flag(self.flag.clone());
        self.children.lock().unwrap().push(child.clone());
        child
    }

    pub fn lock(&self) -> MutexGuard<Progress> {
        self.progress.lock().unwrap()
    }

    pub fn progress(&self) -> Progress {
        let own = *self.lock();
        self.children
            .lock()
            .unwrap()
            .iter()
            .fold(own, |prog, child| prog.combine(&child.progress()))
    }

    pub fn flag(&self) -> &Flag {
        &self.flag
    }

    pub fn stop(&self) {
        self.flag.stop();
    }

    pub fn is_stopped(&self) -> bool {
        self.flag.is_stopped()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    pub done: usize,
    pub from: usize,
    pub is_done: bool,
}

impl Progress {
    /// Marks the job as finished, `done` is left as is, since searches usually stop before
    /// visiting every cell.
    pub fn finish(&mut self) {
        self.is_done = true;
    }

    pub fn combine(&self, other: &Self) -> Self {
        Self {
            done: self.done + other.done,
            from: self.from + other.from,
            is_done: self.is_done && other.is_done,
        }
    }
}
