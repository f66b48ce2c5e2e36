//! ### English
//! Dedicated GL render thread: a FIFO of boxed tasks executed in enqueue order.
//!
//! The producer EGL context and every pool resource live on this thread; other threads only
//! enqueue work. The worker raises itself to the highest `SCHED_OTHER` priority (best effort)
//! so frame rendering is not starved by the host's worker pools.
//!
//! ### 中文
//! 独立 GL 渲染线程：按入队顺序执行的 boxed 任务 FIFO。
//!
//! 生产者 EGL 上下文与所有缓冲池资源都归属该线程；其他线程只负责入队。
//! 工作线程会尽力将自身提升到最高 `SCHED_OTHER` 优先级，避免被宿主线程池饿死。

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use parking_lot::{Condvar, Mutex};

type Task = Box<dyn FnOnce() + Send + 'static>;

/// ### English
/// Queue state shared between the posting threads and the worker.
///
/// ### 中文
/// 入队线程与工作线程共享的队列状态。
struct Shared {
    /// ### English
    /// Pending tasks in enqueue order.
    ///
    /// ### 中文
    /// 按入队顺序排列的待执行任务。
    queue: Mutex<VecDeque<Task>>,
    /// ### English
    /// Wakes the worker on push and on shutdown.
    ///
    /// ### 中文
    /// 在入队与关停时唤醒工作线程。
    available: Condvar,
    /// ### English
    /// Shutdown flag; once set, `post` refuses new tasks and the worker drains then exits.
    ///
    /// ### 中文
    /// 关停标记；置位后 `post` 拒绝新任务，工作线程排空队列后退出。
    stop: AtomicBool,
}

/// ### English
/// Owns the dedicated render thread and its task queue.
///
/// ### 中文
/// 持有独立渲染线程及其任务队列。
pub(crate) struct RenderThread {
    shared: Arc<Shared>,
    worker: Mutex<Option<thread::JoinHandle<()>>>,
    worker_id: thread::ThreadId,
}

impl RenderThread {
    /// ### English
    /// Spawns the worker. Fails only if the OS refuses to create the thread.
    ///
    /// ### 中文
    /// 启动工作线程。仅在操作系统拒绝创建线程时失败。
    pub(crate) fn new() -> Result<Self, String> {
        let shared = Arc::new(Shared {
            queue: Mutex::new(VecDeque::new()),
            available: Condvar::new(),
            stop: AtomicBool::new(false),
        });

        let worker_shared = Arc::clone(&shared);
        let worker = thread::Builder::new()
            .name("mpv-texture-bridge-render".to_string())
            .spawn(move || run_worker(worker_shared))
            .map_err(|err| format!("Failed to spawn the render thread: {err}"))?;
        let worker_id = worker.thread().id();

        Ok(Self {
            shared,
            worker: Mutex::new(Some(worker)),
            worker_id,
        })
    }

    /// ### English
    /// Enqueues a task. Returns `false` iff shutdown has begun.
    ///
    /// ### 中文
    /// 入队一个任务。仅在已开始关停时返回 `false`。
    pub(crate) fn post(&self, task: impl FnOnce() + Send + 'static) -> bool {
        if self.shared.stop.load(Ordering::Acquire) {
            return false;
        }

        {
            let mut queue = self.shared.queue.lock();
            if self.shared.stop.load(Ordering::Acquire) {
                return false;
            }
            queue.push_back(Box::new(task));
        }
        self.shared.available.notify_one();
        true
    }

    /// ### English
    /// Enqueues a task and blocks until it has run. When called from the render thread itself
    /// the task runs inline (ahead of anything queued) to avoid self-deadlock.
    ///
    /// ### 中文
    /// 入队任务并阻塞直至其执行完毕。若在渲染线程自身调用，则内联执行（先于队列中的任务），
    /// 以避免自我死锁。
    pub(crate) fn post_and_wait(&self, task: impl FnOnce() + Send + 'static) -> bool {
        if self.is_current_thread() {
            task();
            return true;
        }

        struct Completion {
            done: Mutex<bool>,
            signal: Condvar,
        }

        let completion = Arc::new(Completion {
            done: Mutex::new(false),
            signal: Condvar::new(),
        });

        let worker_completion = Arc::clone(&completion);
        let posted = self.post(move || {
            task();
            *worker_completion.done.lock() = true;
            worker_completion.signal.notify_one();
        });
        if !posted {
            return false;
        }

        let mut done = completion.done.lock();
        while !*done {
            completion.signal.wait(&mut done);
        }
        true
    }

    /// ### English
    /// Returns whether the caller is the render thread.
    ///
    /// ### 中文
    /// 返回调用方是否为渲染线程。
    pub(crate) fn is_current_thread(&self) -> bool {
        thread::current().id() == self.worker_id
    }

    /// ### English
    /// Begins shutdown: refuses new tasks and wakes the worker. Does not wait; already queued
    /// tasks still drain.
    ///
    /// ### 中文
    /// 开始关停：拒绝新任务并唤醒工作线程。不等待；已入队任务仍会排空。
    pub(crate) fn request_shutdown(&self) {
        self.shared.stop.store(true, Ordering::Release);
        self.shared.available.notify_all();
    }

    /// ### English
    /// Shuts down and joins the worker; idempotent.
    ///
    /// ### 中文
    /// 关停并 join 工作线程；幂等。
    pub(crate) fn shutdown_and_join(&self) {
        self.request_shutdown();
        if let Some(worker) = self.worker.lock().take() {
            let _ = worker.join();
        }
    }
}

impl Drop for RenderThread {
    fn drop(&mut self) {
        self.shutdown_and_join();
    }
}

fn run_worker(shared: Arc<Shared>) {
    raise_thread_priority();

    loop {
        let task = {
            let mut queue = shared.queue.lock();
            loop {
                if let Some(task) = queue.pop_front() {
                    break task;
                }
                if shared.stop.load(Ordering::Acquire) {
                    return;
                }
                shared.available.wait(&mut queue);
            }
        };

        task();
    }
}

/// ### English
/// Raises the worker to the highest priority `SCHED_OTHER` allows. Best effort; failure is
/// non-fatal and ignored.
///
/// ### 中文
/// 将工作线程提升到 `SCHED_OTHER` 允许的最高优先级。尽力而为；失败不致命、直接忽略。
#[cfg(target_os = "linux")]
fn raise_thread_priority() {
    unsafe {
        let mut param: libc::sched_param = std::mem::zeroed();
        param.sched_priority = libc::sched_get_priority_max(libc::SCHED_OTHER);
        let _ = libc::pthread_setschedparam(libc::pthread_self(), libc::SCHED_OTHER, &param);
    }
}

#[cfg(not(target_os = "linux"))]
fn raise_thread_priority() {}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use parking_lot::Mutex;

    use super::RenderThread;

    #[test]
    fn tasks_run_in_enqueue_order() {
        let thread = RenderThread::new().expect("spawn");
        let order = Arc::new(Mutex::new(Vec::new()));

        for i in 0..100 {
            let order = Arc::clone(&order);
            assert!(thread.post(move || order.lock().push(i)));
        }
        assert!(thread.post_and_wait(|| {}));

        assert_eq!(*order.lock(), (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn post_and_wait_observes_the_task_result() {
        let thread = RenderThread::new().expect("spawn");
        let value = Arc::new(AtomicUsize::new(0));

        let task_value = Arc::clone(&value);
        assert!(thread.post_and_wait(move || task_value.store(42, Ordering::Release)));
        assert_eq!(value.load(Ordering::Acquire), 42);
    }

    #[test]
    fn post_and_wait_from_the_worker_runs_inline() {
        let thread = Arc::new(RenderThread::new().expect("spawn"));
        let order = Arc::new(Mutex::new(Vec::new()));

        let inner_thread = Arc::clone(&thread);
        let inner_order = Arc::clone(&order);
        assert!(thread.post_and_wait(move || {
            assert!(inner_thread.is_current_thread());
            let nested_order = Arc::clone(&inner_order);
            // Inline execution: runs now, not after this task returns.
            assert!(inner_thread.post_and_wait(move || nested_order.lock().push("inner")));
            inner_order.lock().push("outer");
        }));

        assert_eq!(*order.lock(), vec!["inner", "outer"]);
    }

    #[test]
    fn queued_tasks_drain_before_the_worker_exits() {
        let thread = RenderThread::new().expect("spawn");
        let counter = Arc::new(AtomicUsize::new(0));

        for _ in 0..50 {
            let counter = Arc::clone(&counter);
            assert!(thread.post(move || {
                std::thread::sleep(Duration::from_micros(100));
                counter.fetch_add(1, Ordering::AcqRel);
            }));
        }

        thread.shutdown_and_join();
        assert_eq!(counter.load(Ordering::Acquire), 50);
    }

    #[test]
    fn post_is_refused_after_shutdown() {
        let thread = RenderThread::new().expect("spawn");
        thread.request_shutdown();
        assert!(!thread.post(|| {}));
        assert!(!thread.post_and_wait(|| {}));
    }

    #[test]
    fn is_current_thread_distinguishes_the_worker() {
        let thread = RenderThread::new().expect("spawn");
        assert!(!thread.is_current_thread());

        let result = Arc::new(AtomicUsize::new(usize::MAX));
        let task_result = Arc::clone(&result);
        let probe = Arc::new(RenderThread::new().expect("spawn probe"));
        let probe_clone = Arc::clone(&probe);
        assert!(probe.post_and_wait(move || {
            task_result.store(usize::from(probe_clone.is_current_thread()), Ordering::Release);
        }));
        assert_eq!(result.load(Ordering::Acquire), 1);
    }
}
