//! Fixed template text written into workspaces and staging directories.
//!
//! The pipeline only guarantees these are written byte-for-byte; their
//! content is a collaborator concern, not pipeline logic. The host program
//! wires a logic unit into an HTTP server with a pooled per-request
//! context, panic recovery, and the `-info` introspection flag.

/// Scaffold for a new logic unit (`effe new`).
///
/// The embedded `Info` literals (`hello_effe`, `0.1`) are what a freshly
/// scaffolded and compiled unit reports back through `-info`.
pub const LOGIC: &str = r#"package logic

import (
	"fmt"
	"math/rand"
	"net/http"
	"time"
)

var Info string = `
{
	"name": "hello_effe",
	"version": "0.1",
	"doc" : "Getting start with effe"
}
`

type Context struct {
	value int64
}

func Init() {
	rand.Seed(time.Now().UTC().UnixNano())
}

func Start() Context {
	fmt.Println("Start new Context")
	return Context{1 + rand.Int63n(2)}
}

func Run(ctx Context, w http.ResponseWriter, r *http.Request) error {
	fmt.Fprintf(w, "Hello from Effe:  %d\n", ctx.value)
	return nil
}

func Stop(ctx Context) { return }
"#;

/// Generated host program compiled together with the user's logic unit.
pub const HOST: &str = r#"package main

import (
	"effe/logic"
	"flag"
	"fmt"
	"log/syslog"
	"net/http"
	"sync"
)

func generateHandler(pool *sync.Pool, logger *syslog.Writer) func(http.ResponseWriter, *http.Request) {
	return func(w http.ResponseWriter, r *http.Request) {
		ctx := pool.Get().(logic.Context)
		defer func() {
			if r := recover(); r != nil {
				w.WriteHeader(http.StatusInternalServerError)
				logger.Crit("Logic Panicked")
			}
		}()
		err := logic.Run(ctx, w, r)
		if err != nil {
			logger.Debug(err.Error())
		}
		pool.Put(ctx)
	}
}

func main() {
	port := flag.Int("port", 8080, "Port where serve the effe.")
	info := flag.Bool("info", false, "Print the effe information, then exit.")
	flag.Parse()
	if *info {
		fmt.Println(logic.Info)
		return
	}
	url := fmt.Sprintf(":%d", *port)
	logic.Init()
	logger, _ := syslog.New(syslog.LOG_ERR|syslog.LOG_USER, "Logs From Effe ")
	var ctxPool = &sync.Pool{New: func() interface{} {
		return logic.Start()
	}}
	http.HandleFunc("/", generateHandler(ctxPool, logger))
	http.ListenAndServe(url, nil)
}
"#;

/// Minimal image descriptor: a single ADD/ENTRYPOINT pair referencing the
/// artifact under its fixed staged name.
pub const DOCKERFILE: &str = r#"FROM centurylink/ca-certs

ADD exec exec
ENTRYPOINT ["./exec"]
"#;

/// Fixed name the artifact is hard-linked under inside an image context.
pub const IMAGE_ARTIFACT_NAME: &str = "exec";
